// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::needless_pass_by_value)]

//! # songplay-etl
//!
//! A batch job that turns a music-streaming service's raw song metadata and
//! user activity logs into a star schema of partitioned Parquet datasets.
//!
//! ## Features
//!
//! - **Object storage input and output**: S3 (`s3://`, `s3a://`, `s3n://`),
//!   GCS, Azure Blob Storage or the local filesystem
//! - **Glob inputs**: `*`, `?`, `**`, `[...]` and `{a,b}` over object keys
//! - **Columnar processing**: DataFusion plans over Arrow RecordBatches, one
//!   partition per planned group of input files
//! - **Hive-style output**: `table/col=value/part-00000.snappy.parquet` plus
//!   a `_SUCCESS` marker per table
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use songplay_etl::{EtlConfig, EtlJob, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = EtlConfig::from_file("config/etl.yaml")?;
//!     let report = EtlJob::new(&config)?.run().await?;
//!     println!("{}", serde_json::to_string_pretty(&report)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//!   song_data/*/*/*/*.json                 log_data/*/*/*.json
//!            │                                      │
//!      ┌─────┴─────┐                          ┌─────┴─────┐
//!      │  source   │  list, plan, fetch,      │  source   │
//!      │           │  decode to Arrow         │           │
//!      └─────┬─────┘                          └─────┬─────┘
//!            │                                      │ calendar parts,
//!            │                                      │ page == NextSong
//!     ┌──────┴──────┐              ┌────────────────┼───────────────┐
//!     │             │              │                │               │
//!   songs        artists         users            time      join songs on
//!     │             │              │                │      (artist, title)
//!     │             │              │                │               │
//!     └─────────────┴──────────────┴────────┬───────┴───────────songplays
//!                                           │
//!                                  output: partitioned Parquet
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the job
pub mod error;

/// Configuration loading and validation
pub mod config;

/// Calendar decomposition of event timestamps
pub mod calendar;

/// Column names, source schemas and output tables
pub mod model;

/// JSON decoding and JSON to Arrow conversion
pub mod decode;

/// DataFusion tables and partition-wise maps
pub mod frame;

/// Object storage locations and glob matching
pub mod storage;

/// JSON corpus reader
pub mod source;

/// Parquet encoding and partitioned table output
pub mod output;

/// Star schema transformations
pub mod transform;

/// ETL job orchestration
pub mod job;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::EtlConfig;
pub use error::{Error, Result};
pub use job::{EtlJob, JobReport, TableReport};
pub use model::Table;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
