//! DataFusion plumbing
//!
//! Decoded input partitions are registered as in-memory tables, and every
//! relational step (projection, filter, join, sort) runs as a DataFusion
//! plan. The two steps with no DataFusion operator run as partition-wise
//! maps over the executed plan: appending computed columns and numbering
//! rows with a monotonic id.
//!
//! # Overview
//!
//! - [`from_partitions`] wraps one Arrow batch per input partition in a
//!   `MemTable`
//! - [`map_partitions`] applies a batch function to every partition
//! - [`with_monotonic_id`] appends `(partition << 33) + row`
//! - [`collect_batch`] and [`num_rows`] execute a plan

mod partitions;
mod session;

pub use partitions::{
    assign_monotonic_ids, extend_schema, i64_column, map_partitions, with_monotonic_id,
};
pub use session::{collect_batch, from_partitioned, from_partitions, num_rows};
