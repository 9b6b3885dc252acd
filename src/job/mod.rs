//! The ETL job
//!
//! [`EtlJob`] wires the two JSON sources, the transformations and the table
//! sink together. The song pipeline writes `songs_table` and
//! `artists_table`; the log pipeline writes `users_table`, `time_table` and,
//! after re-reading the song corpus, `songplays_table`. The two pipelines
//! run concurrently and share nothing but the read-only song source.

mod etl;
mod report;

pub use crate::output::TableReport;
pub use etl::EtlJob;
pub use report::JobReport;
