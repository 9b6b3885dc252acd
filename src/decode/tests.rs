//! Tests for decode module

use super::*;
use crate::error::Error;
use crate::model::{log_source_schema, song_source_schema};
use arrow::array::{AsArray, Int64Array};
use arrow::datatypes::{DataType, Field, Float64Type, Int64Type, Schema, TimeUnit};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

// ============================================================================
// JSON Object Stream Tests
// ============================================================================

#[test]
fn test_decode_json_lines() {
    let body = br#"{"artist": "Des'ree", "page": "NextSong"}
{"artist": null, "page": "Home"}
"#;
    let records = decode_records("log.json", body).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["artist"], "Des'ree");
    assert_eq!(records[1]["page"], "Home");
}

#[test]
fn test_decode_single_pretty_object() {
    let body = br#"{
    "song_id": "SOMZWCG12A8C13C480",
    "title": "I Didn't Mean To",
    "year": 0
}"#;
    let records = decode_records("song.json", body).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["title"], "I Didn't Mean To");
}

#[test]
fn test_decode_skips_blank_lines_and_bom() {
    let mut body = vec![0xEF, 0xBB, 0xBF];
    body.extend_from_slice(b"\n\n{\"a\": 1}\n\n   \n{\"a\": 2}\n");
    let records = decode_records("x.json", &body).unwrap();
    assert_eq!(records.len(), 2);
}

#[test]
fn test_decode_empty_body() {
    assert!(decode_records("empty.json", b"").unwrap().is_empty());
}

#[test]
fn test_decode_malformed_is_error() {
    let err = decode_records("bad.json", b"{\"a\": 1}\n{\"a\": }\n").unwrap_err();
    match err {
        Error::Decode { path, message } => {
            assert_eq!(path, "bad.json");
            assert!(message.starts_with("line 2"), "{message}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_decode_non_object_is_error() {
    let err = decode_records("num.json", b"{\"a\": 1}\n42\n").unwrap_err();
    assert!(err.to_string().contains("record 2 is a JSON number"));
}

#[test]
fn test_decode_top_level_array() {
    let records = decode_records("arr.json", b"[{\"a\": 1}, {\"a\": 2}]\n{\"a\": 3}").unwrap();
    let values: Vec<i64> = records.iter().map(|r| r["a"].as_i64().unwrap()).collect();
    assert_eq!(values, vec![1, 2, 3]);
}

#[test]
fn test_decode_array_of_scalars_is_error() {
    let err = decode_records("arr.json", b"[{\"a\": 1}, \"x\"]").unwrap_err();
    assert!(err
        .to_string()
        .contains("record 1 element 2 is a JSON string"));
}

// ============================================================================
// JSON to Arrow Tests
// ============================================================================

#[test]
fn test_records_to_batch_follows_schema() {
    let records = vec![json!({
        "song_id": "S1",
        "title": "Clocks",
        "artist_id": "A1",
        "artist_name": "Coldplay",
        "year": 2000,
        "duration": 230,
        "unrelated": "ignored"
    })];

    let schema = song_source_schema();
    let batch = records_to_batch(&records, &schema).unwrap();
    assert_eq!(batch.schema(), schema);
    assert_eq!(batch.num_rows(), 1);

    let duration = batch
        .column_by_name("duration")
        .unwrap()
        .as_primitive::<Float64Type>();
    assert_eq!(duration.value(0), 230.0);

    // never present in the record
    assert!(batch.column_by_name("artist_latitude").unwrap().is_null(0));
}

#[test]
fn test_records_to_batch_coerces_leniently() {
    let records = vec![
        json!({"userId": 10, "sessionId": "100", "ts": 1_542_069_000_000_i64}),
        json!({"userId": "", "sessionId": "not a number", "ts": 1.5e12}),
        json!({"userId": null, "sessionId": true}),
    ];

    let batch = records_to_batch(&records, &log_source_schema()).unwrap();

    let user_id = batch.column_by_name("userId").unwrap().as_string::<i32>();
    assert_eq!(user_id.value(0), "10");
    assert_eq!(user_id.value(1), "");
    assert!(user_id.is_null(2));

    let session = batch
        .column_by_name("sessionId")
        .unwrap()
        .as_primitive::<Int64Type>();
    assert_eq!(session, &Int64Array::from(vec![Some(100), None, None]));

    let ts = batch.column_by_name("ts").unwrap().as_primitive::<Int64Type>();
    assert_eq!(ts.value(0), 1_542_069_000_000);
    assert_eq!(ts.value(1), 1_500_000_000_000);
    assert!(ts.is_null(2));
}

#[test]
fn test_records_to_batch_empty() {
    let batch = records_to_batch(&[], &song_source_schema()).unwrap();
    assert_eq!(batch.num_rows(), 0);
    assert_eq!(batch.num_columns(), 10);
}

#[test]
fn test_records_to_batch_rejects_nested_types() {
    let schema = Arc::new(Schema::new(vec![Field::new(
        "tags",
        DataType::List(Arc::new(Field::new("item", DataType::Utf8, true))),
        true,
    )]));
    let err = records_to_batch(&[json!({"tags": ["a"]})], &schema).unwrap_err();
    assert!(matches!(err, Error::ColumnType { column, .. } if column == "tags"));
}

// ============================================================================
// Arrow to JSON Tests
// ============================================================================

#[test]
fn test_batch_to_json() {
    let schema = Arc::new(Schema::new(vec![
        Field::new("name", DataType::Utf8, true),
        Field::new("plays", DataType::Int32, true),
        Field::new(
            "start_time",
            DataType::Timestamp(TimeUnit::Millisecond, None),
            true,
        ),
    ]));
    let records = vec![
        json!({"name": "Coldplay", "plays": 3, "start_time": 1_542_069_000_000_i64}),
        json!({"name": null, "plays": "7"}),
    ];

    let batch = records_to_batch(&records, &schema).unwrap();
    let back = batch_to_json(&batch).unwrap();
    assert_eq!(
        back,
        vec![
            json!({"name": "Coldplay", "plays": 3, "start_time": 1_542_069_000_000_i64}),
            json!({"name": null, "plays": 7, "start_time": null}),
        ]
    );
}
