//! Record decoding
//!
//! Turns raw object bytes into JSON records, and JSON records into Arrow
//! batches shaped by a fixed source schema.
//!
//! # Overview
//!
//! - [`decode_records`] accepts JSON Lines as well as concatenated or
//!   pretty-printed objects; every top-level value must be an object.
//! - [`records_to_batch`] coerces values leniently into the schema's types;
//!   missing or uncoercible values become null.
//! - [`batch_to_json`] goes the other way, mainly for inspection and tests.

mod columnar;
mod json;

pub use columnar::{batch_to_json, records_to_batch};
pub use json::decode_records;

#[cfg(test)]
mod tests;
