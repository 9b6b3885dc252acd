//! Data model
//!
//! Raw column names of the two JSON corpora, the Arrow schemas they are read
//! against, and the five output tables of the star schema.

pub mod columns;
mod tables;

pub use tables::{log_source_schema, song_source_schema, Table};
