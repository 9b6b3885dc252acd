//! Object storage access
//!
//! Input corpora and output tables can live on S3 (including `s3a://` and
//! `s3n://` spellings), GCS, Azure Blob Storage or the local filesystem.
//! [`StorageLocation`] hides which one; [`GlobPattern`] selects objects
//! beneath a location.

mod glob;
mod location;

pub use glob::{is_hidden, split_glob, GlobPattern};
pub use location::{Access, StorageLocation};
