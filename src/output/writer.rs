//! Parquet encoder
//!
//! Encodes Arrow RecordBatches into in-memory Parquet files, ready to be
//! put into an object store.

use crate::config::CompressionCodec;
use crate::error::{Error, Result};
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::WriterProperties;

/// Configuration for Parquet writer
#[derive(Debug, Clone)]
pub struct ParquetWriterConfig {
    compression: Compression,
    row_group_size: usize,
}

impl Default for ParquetWriterConfig {
    fn default() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: 1024 * 1024, // 1M rows
        }
    }
}

impl ParquetWriterConfig {
    /// Create a new config with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Config for a configured codec
    #[must_use]
    pub fn for_codec(codec: CompressionCodec) -> Self {
        let config = Self::new();
        match codec {
            CompressionCodec::Snappy => config,
            CompressionCodec::Zstd => config.zstd(),
            CompressionCodec::Gzip => config.gzip(),
            CompressionCodec::None => config.uncompressed(),
        }
    }

    /// Set row group size
    #[must_use]
    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size.max(1);
        self
    }

    /// Use no compression
    #[must_use]
    pub fn uncompressed(mut self) -> Self {
        self.compression = Compression::UNCOMPRESSED;
        self
    }

    /// Use ZSTD compression
    #[must_use]
    pub fn zstd(mut self) -> Self {
        self.compression = Compression::ZSTD(ZstdLevel::default());
        self
    }

    /// Use GZIP compression
    #[must_use]
    pub fn gzip(mut self) -> Self {
        self.compression = Compression::GZIP(GzipLevel::default());
        self
    }

    #[must_use]
    pub fn compression(&self) -> Compression {
        self.compression
    }

    #[must_use]
    pub fn row_group_size(&self) -> usize {
        self.row_group_size
    }

    fn build_properties(&self) -> WriterProperties {
        WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build()
    }
}

/// Parquet writer into an in-memory buffer
pub struct ParquetWriter {
    writer: ArrowWriter<Vec<u8>>,
    rows_written: usize,
}

impl ParquetWriter {
    pub fn new(schema: SchemaRef, config: &ParquetWriterConfig) -> Result<Self> {
        let writer = ArrowWriter::try_new(Vec::new(), schema, Some(config.build_properties()))
            .map_err(|e| Error::output(format!("Failed to create Parquet writer: {e}")))?;

        Ok(Self {
            writer,
            rows_written: 0,
        })
    }

    /// Write a RecordBatch to the buffer
    pub fn write(&mut self, batch: &RecordBatch) -> Result<()> {
        self.writer
            .write(batch)
            .map_err(|e| Error::output(format!("Failed to write batch: {e}")))?;

        self.rows_written += batch.num_rows();
        Ok(())
    }

    #[must_use]
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Finalize the file and hand back its bytes
    pub fn finish(self) -> Result<Bytes> {
        let buffer = self
            .writer
            .into_inner()
            .map_err(|e| Error::output(format!("Failed to close Parquet writer: {e}")))?;
        Ok(Bytes::from(buffer))
    }
}

/// Encode one RecordBatch as a complete Parquet file
pub fn encode_batch(batch: &RecordBatch, config: &ParquetWriterConfig) -> Result<Bytes> {
    let mut writer = ParquetWriter::new(batch.schema(), config)?;
    writer.write(batch)?;
    writer.finish()
}
