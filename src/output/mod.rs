//! Output module
//!
//! Handles Parquet encoding and partitioned table writing.
//!
//! # Overview
//!
//! - [`ParquetWriterConfig`] maps the configured codec onto writer properties
//!   and [`encode_batch`] produces a complete in-memory Parquet file.
//! - [`partition_frame`] executes a table's plan sorted on its partition
//!   columns and splits the rows into `column=value` directories.
//! - [`TableSink`] applies the save mode, writes part files and the
//!   `_SUCCESS` marker, and reports what it wrote.

mod partition;
mod sink;
mod writer;

pub use partition::{partition_frame, partition_value, PartitionGroup, DEFAULT_PARTITION};
pub use sink::{TableReport, TableSink, SUCCESS_MARKER};
pub use writer::{encode_batch, ParquetWriter, ParquetWriterConfig};

#[cfg(test)]
mod tests;
