//! Run summary

use crate::output::TableReport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What one run wrote, printed as JSON when the job finishes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobReport {
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    /// In write order: songs, artists, users, time, songplays
    pub tables: Vec<TableReport>,
}

impl JobReport {
    /// Report for a named table
    pub fn table(&self, name: &str) -> Option<&TableReport> {
        self.tables.iter().find(|t| t.table == name)
    }

    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(|t| t.rows).sum()
    }
}
