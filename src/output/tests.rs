//! Tests for output module

use super::*;
use crate::config::{CompressionCodec, OutputConfig, SaveMode};
use crate::decode::{batch_to_json, records_to_batch};
use crate::error::Error;
use crate::frame::from_partitions;
use crate::model::Table;
use crate::storage::StorageLocation;
use arrow::array::Int32Array;
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use datafusion::prelude::{DataFrame, SessionContext};
use object_store::memory::InMemory;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::basic::Compression;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;
use test_case::test_case;

fn songs_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("song_id", DataType::Utf8, true),
        Field::new("title", DataType::Utf8, true),
        Field::new("artist_id", DataType::Utf8, true),
        Field::new("year", DataType::Int64, true),
        Field::new("duration", DataType::Float64, true),
    ]))
}

fn songs_batch(records: &[Value]) -> RecordBatch {
    records_to_batch(records, &songs_schema()).unwrap()
}

fn songs_frame(records: &[Value]) -> DataFrame {
    from_partitions(&SessionContext::new(), songs_schema(), vec![songs_batch(records)]).unwrap()
}

fn song_ids(batch: &RecordBatch) -> Vec<String> {
    let mut ids: Vec<String> = batch_to_json(batch)
        .unwrap()
        .iter()
        .map(|r| r["song_id"].as_str().unwrap().to_string())
        .collect();
    ids.sort();
    ids
}

fn catalog() -> Vec<Value> {
    vec![
        json!({"song_id": "S1", "title": "Clocks", "artist_id": "A1", "year": 2002, "duration": 307.5}),
        json!({"song_id": "S2", "title": "Yellow", "artist_id": "A1", "year": 2000, "duration": 269.0}),
        json!({"song_id": "S3", "title": "Trouble", "artist_id": "A1", "year": 2000, "duration": 273.1}),
        json!({"song_id": "S4", "title": "Untitled", "artist_id": "A2", "year": 0, "duration": 100.0}),
    ]
}

fn sink(mode: SaveMode, max_rows_per_file: usize) -> TableSink {
    let location = StorageLocation::new(Arc::new(InMemory::new()), "out", "memory");
    TableSink::new(
        location,
        &OutputConfig {
            mode,
            max_rows_per_file,
            ..OutputConfig::default()
        },
    )
}

async fn keys(sink: &TableSink) -> Vec<String> {
    let root = sink.location();
    let mut keys: Vec<String> = root
        .list()
        .await
        .unwrap()
        .iter()
        .filter_map(|meta| root.relative(&meta.location))
        .collect();
    keys.sort();
    keys
}

async fn read_parquet(sink: &TableSink, key: &str) -> Vec<Value> {
    let root = sink.location();
    let body = root.get(&root.path(key.split('/'))).await.unwrap();
    let reader = ParquetRecordBatchReaderBuilder::try_new(body)
        .unwrap()
        .build()
        .unwrap();
    reader
        .flat_map(|batch| batch_to_json(&batch.unwrap()).unwrap())
        .collect()
}

// ============================================================================
// Writer Config Tests
// ============================================================================

#[test]
fn test_writer_config_default() {
    let config = ParquetWriterConfig::default();
    assert_eq!(config.compression(), Compression::SNAPPY);
    assert_eq!(config.row_group_size(), 1024 * 1024);
}

#[test_case(CompressionCodec::Snappy, Compression::SNAPPY ; "snappy")]
#[test_case(CompressionCodec::None, Compression::UNCOMPRESSED ; "none")]
fn test_writer_config_for_codec(codec: CompressionCodec, expected: Compression) {
    assert_eq!(ParquetWriterConfig::for_codec(codec).compression(), expected);
}

#[test]
fn test_writer_config_zstd_and_gzip() {
    assert!(matches!(
        ParquetWriterConfig::for_codec(CompressionCodec::Zstd).compression(),
        Compression::ZSTD(_)
    ));
    assert!(matches!(
        ParquetWriterConfig::for_codec(CompressionCodec::Gzip).compression(),
        Compression::GZIP(_)
    ));
}

#[test]
fn test_encode_batch_roundtrip() {
    let batch = songs_batch(&catalog());
    let body = encode_batch(&batch, &ParquetWriterConfig::new().zstd()).unwrap();
    assert_eq!(&body[..4], b"PAR1");

    let mut reader = ParquetRecordBatchReaderBuilder::try_new(body)
        .unwrap()
        .build()
        .unwrap();
    let decoded = reader.next().unwrap().unwrap();
    assert_eq!(decoded.num_rows(), 4);
    assert_eq!(decoded.schema().fields(), batch.schema().fields());
}

#[test]
fn test_parquet_writer_counts_rows() {
    let batch = songs_batch(&catalog());
    let mut writer = ParquetWriter::new(batch.schema(), &ParquetWriterConfig::default()).unwrap();
    writer.write(&batch).unwrap();
    writer.write(&batch.slice(0, 1)).unwrap();
    assert_eq!(writer.rows_written(), 5);
    assert!(!writer.finish().unwrap().is_empty());
}

// ============================================================================
// Partitioning Tests
// ============================================================================

#[tokio::test]
async fn test_partition_frame_groups_and_drops_keys() {
    let groups = partition_frame(songs_frame(&catalog()), &["year", "artist_id"])
        .await
        .unwrap();

    let segments: Vec<Vec<String>> = groups.iter().map(|g| g.segments.clone()).collect();
    assert_eq!(
        segments,
        vec![
            vec!["year=0".to_string(), "artist_id=A2".to_string()],
            vec!["year=2000".to_string(), "artist_id=A1".to_string()],
            vec!["year=2002".to_string(), "artist_id=A1".to_string()],
        ]
    );

    let year_2000 = &groups[1].batch;
    assert_eq!(year_2000.num_rows(), 2);
    assert!(year_2000.column_by_name("year").is_none());
    assert!(year_2000.column_by_name("artist_id").is_none());
    assert_eq!(song_ids(year_2000), vec!["S2", "S3"]);
}

#[tokio::test]
async fn test_partition_frame_default_partition() {
    let frame = songs_frame(&[
        json!({"song_id": "S1", "artist_id": null, "year": 2000}),
        json!({"song_id": "S2", "artist_id": "", "year": 2000}),
        json!({"song_id": "S3", "artist_id": "A1", "year": null}),
    ]);
    let groups = partition_frame(frame, &["artist_id"]).await.unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].segments, vec!["artist_id=A1".to_string()]);
    assert_eq!(
        groups[1].segments,
        vec![format!("artist_id={DEFAULT_PARTITION}")]
    );
    assert_eq!(song_ids(&groups[1].batch), vec!["S1", "S2"]);
}

#[tokio::test]
async fn test_partition_frame_null_numeric_key() {
    let frame = songs_frame(&[
        json!({"song_id": "S1", "artist_id": "A1", "year": null}),
        json!({"song_id": "S2", "artist_id": "A1", "year": 1999}),
    ]);
    let groups = partition_frame(frame, &["year"]).await.unwrap();
    let segments: Vec<String> = groups.iter().map(|g| g.segments[0].clone()).collect();
    assert_eq!(
        segments,
        vec!["year=1999".to_string(), format!("year={DEFAULT_PARTITION}")]
    );
}

#[tokio::test]
async fn test_partition_frame_without_columns() {
    let groups = partition_frame(songs_frame(&catalog()), &[]).await.unwrap();
    assert_eq!(groups.len(), 1);
    assert!(groups[0].segments.is_empty());
    assert_eq!(groups[0].batch.num_columns(), 5);
    assert_eq!(song_ids(&groups[0].batch), vec!["S1", "S2", "S3", "S4"]);
}

#[tokio::test]
async fn test_partition_frame_empty_and_missing_column() {
    assert!(partition_frame(songs_frame(&[]), &["year"])
        .await
        .unwrap()
        .is_empty());

    let err = partition_frame(songs_frame(&catalog()), &["month"])
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ColumnNotFound { .. }));
}

#[test]
fn test_partition_value_renders_integers() {
    let array = Int32Array::from(vec![Some(11), None]);
    assert_eq!(partition_value(&array, 0).unwrap(), "11");
    assert_eq!(partition_value(&array, 1).unwrap(), DEFAULT_PARTITION);
}

// ============================================================================
// Sink Tests
// ============================================================================

#[tokio::test]
async fn test_sink_writes_partitioned_table() {
    let sink = sink(SaveMode::ErrorIfExists, 1000);
    let report = sink.write(Table::Songs, songs_frame(&catalog())).await.unwrap();

    assert_eq!(
        report,
        TableReport {
            table: "songs_table".to_string(),
            location: "memory://out/songs_table".to_string(),
            rows: 4,
            partitions: 3,
            files: 3,
        }
    );
    assert_eq!(
        keys(&sink).await,
        vec![
            "songs_table/_SUCCESS",
            "songs_table/year=0/artist_id=A2/part-00000.snappy.parquet",
            "songs_table/year=2000/artist_id=A1/part-00001.snappy.parquet",
            "songs_table/year=2002/artist_id=A1/part-00002.snappy.parquet",
        ]
    );

    let mut rows = read_parquet(
        &sink,
        "songs_table/year=2000/artist_id=A1/part-00001.snappy.parquet",
    )
    .await;
    rows.sort_by_key(|r| r["song_id"].as_str().map(String::from));
    assert_eq!(
        rows,
        vec![
            json!({"song_id": "S2", "title": "Yellow", "duration": 269.0}),
            json!({"song_id": "S3", "title": "Trouble", "duration": 273.1}),
        ]
    );
}

#[tokio::test]
async fn test_sink_splits_large_groups() {
    let sink = sink(SaveMode::ErrorIfExists, 1);
    let report = sink.write(Table::Artists, songs_frame(&catalog())).await.unwrap();
    assert_eq!(report.partitions, 1);
    assert_eq!(report.files, 4);
    assert_eq!(keys(&sink).await.len(), 5);
}

#[tokio::test]
async fn test_sink_empty_table_writes_only_marker() {
    let sink = sink(SaveMode::ErrorIfExists, 1000);
    let report = sink
        .write(Table::Users, songs_frame(&[]))
        .await
        .unwrap();
    assert_eq!(report.rows, 0);
    assert_eq!(report.files, 0);
    assert_eq!(keys(&sink).await, vec!["users_table/_SUCCESS"]);
}

#[tokio::test]
async fn test_sink_error_if_exists() {
    let sink = sink(SaveMode::ErrorIfExists, 1000);
    sink.write(Table::Artists, songs_frame(&catalog())).await.unwrap();

    let err = sink
        .write(Table::Artists, songs_frame(&catalog()))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::OutputExists { path } if path.ends_with("artists_table")));

    // other tables are unaffected
    sink.write(Table::Users, songs_frame(&catalog())).await.unwrap();
}

#[tokio::test]
async fn test_sink_overwrite_replaces_contents() {
    let sink = sink(SaveMode::Overwrite, 1);
    sink.write(Table::Artists, songs_frame(&catalog())).await.unwrap();
    let report = sink
        .write(Table::Artists, songs_frame(&catalog()[..1]))
        .await
        .unwrap();

    assert_eq!(report.files, 1);
    assert_eq!(
        keys(&sink).await,
        vec![
            "artists_table/_SUCCESS",
            "artists_table/part-00000.snappy.parquet",
        ]
    );
}

#[tokio::test]
async fn test_sink_uncompressed_file_name() {
    let location = StorageLocation::new(Arc::new(InMemory::new()), "", "memory");
    let sink = TableSink::new(
        location,
        &OutputConfig {
            compression: CompressionCodec::None,
            ..OutputConfig::default()
        },
    );
    sink.write(Table::Artists, songs_frame(&catalog()[..1])).await.unwrap();
    assert!(keys(&sink)
        .await
        .contains(&"artists_table/part-00000.parquet".to_string()));
}

#[tokio::test]
async fn test_sink_put_bytes_are_parquet() {
    let sink = sink(SaveMode::ErrorIfExists, 1000);
    sink.write(Table::Artists, songs_frame(&catalog())).await.unwrap();
    let root = sink.location();
    let body: Bytes = root
        .get(&root.path(["artists_table", "part-00000.snappy.parquet"]))
        .await
        .unwrap();
    assert_eq!(&body[body.len() - 4..], b"PAR1");
}
