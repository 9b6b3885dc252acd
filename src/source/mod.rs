//! JSON corpus reader
//!
//! A [`JsonSource`] lists the objects matching a glob location, packs them
//! into input partitions, fetches them concurrently and decodes them into a
//! DataFusion frame with one partition per planned group of files.

mod reader;

pub use reader::{plan_partitions, JsonSource};
