//! Table sink
//!
//! Writes one table as a directory of partitioned Parquet part files under
//! the output location, followed by an empty `_SUCCESS` marker.

use super::partition::partition_frame;
use super::writer::{encode_batch, ParquetWriterConfig};
use crate::config::{CompressionCodec, OutputConfig, SaveMode};
use crate::error::{Error, Result};
use crate::model::Table;
use crate::storage::StorageLocation;
use bytes::Bytes;
use datafusion::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Marker written once a table is complete
pub const SUCCESS_MARKER: &str = "_SUCCESS";

/// What was written for one table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableReport {
    pub table: String,
    pub location: String,
    pub rows: usize,
    pub partitions: usize,
    pub files: usize,
}

/// Writes tables below an output location
#[derive(Debug, Clone)]
pub struct TableSink {
    location: StorageLocation,
    mode: SaveMode,
    codec: CompressionCodec,
    writer_config: ParquetWriterConfig,
    max_rows_per_file: usize,
}

impl TableSink {
    pub fn new(location: StorageLocation, config: &OutputConfig) -> Self {
        let max_rows_per_file = config.max_rows_per_file.max(1);
        Self {
            location,
            mode: config.mode,
            codec: config.compression,
            writer_config: ParquetWriterConfig::for_codec(config.compression)
                .with_row_group_size(max_rows_per_file),
            max_rows_per_file,
        }
    }

    pub fn location(&self) -> &StorageLocation {
        &self.location
    }

    /// Execute `frame` and write it as `table`, honoring the save mode
    pub async fn write(&self, table: Table, frame: DataFrame) -> Result<TableReport> {
        let target = self.location.child(table.name());
        self.prepare(&target).await?;

        let groups = partition_frame(frame, table.partition_columns()).await?;

        let mut files = 0usize;
        for group in &groups {
            let mut offset = 0;
            while offset < group.batch.num_rows() {
                let len = self.max_rows_per_file.min(group.batch.num_rows() - offset);
                let chunk = group.batch.slice(offset, len);
                let name = self.part_file_name(files);
                let segments = group.segments.iter().map(String::as_str);
                let path = target.path(segments.chain([name.as_str()]));

                let body = encode_batch(&chunk, &self.writer_config)?;
                debug!(table = %table, rows = len, bytes = body.len(), "Encoded part file");
                target.put(&path, body).await?;

                files += 1;
                offset += len;
            }
        }

        target
            .put(&target.path([SUCCESS_MARKER]), Bytes::new())
            .await?;

        let report = TableReport {
            table: table.name().to_string(),
            location: target.display_url(),
            rows: groups.iter().map(|g| g.batch.num_rows()).sum(),
            partitions: groups.len(),
            files,
        };
        if report.rows == 0 {
            warn!(table = %table, location = %report.location, "Table is empty");
        } else {
            info!(
                table = %table,
                location = %report.location,
                rows = report.rows,
                partitions = report.partitions,
                files = report.files,
                "Wrote table"
            );
        }
        Ok(report)
    }

    async fn prepare(&self, target: &StorageLocation) -> Result<()> {
        if !target.has_objects().await? {
            return Ok(());
        }
        match self.mode {
            SaveMode::ErrorIfExists => Err(Error::OutputExists {
                path: target.display_url(),
            }),
            SaveMode::Overwrite => {
                let deleted = target.delete_all().await?;
                info!(location = %target.display_url(), objects = deleted, "Cleared existing table");
                Ok(())
            }
        }
    }

    fn part_file_name(&self, index: usize) -> String {
        match self.codec.file_infix() {
            Some(infix) => format!("part-{index:05}.{infix}.parquet"),
            None => format!("part-{index:05}.parquet"),
        }
    }
}
