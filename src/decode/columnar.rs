//! JSON records to Arrow and back
//!
//! Records are projected onto a fixed schema. Coercion is
//! lenient: numbers read into text columns keep their decimal text, numeric
//! strings read into numeric columns are parsed, and anything else that does
//! not fit becomes null. Fields absent from the schema are ignored.

use crate::error::{Error, Result};
use arrow::array::{
    Array, ArrayRef, AsArray, BooleanArray, Float64Array, Int32Array, Int64Array, NullArray,
    StringArray, TimestampMillisecondArray,
};
use arrow::datatypes::{
    DataType, Float64Type, Int32Type, Int64Type, SchemaRef, TimeUnit, TimestampMillisecondType,
};
use arrow::record_batch::RecordBatch;
use serde_json::{Map, Number, Value};
use std::sync::Arc;

/// Convert JSON records to a RecordBatch with exactly the given schema
pub fn records_to_batch(records: &[Value], schema: &SchemaRef) -> Result<RecordBatch> {
    if records.is_empty() {
        return Ok(RecordBatch::new_empty(schema.clone()));
    }

    let mut columns: Vec<ArrayRef> = Vec::with_capacity(schema.fields().len());

    for field in schema.fields() {
        let values: Vec<Option<&Value>> = records
            .iter()
            .map(|record| match record {
                Value::Object(obj) => obj.get(field.name()).filter(|v| !v.is_null()),
                _ => None,
            })
            .collect();

        columns.push(build_array(&values, field.name(), field.data_type())?);
    }

    Ok(RecordBatch::try_new(schema.clone(), columns)?)
}

fn build_array(values: &[Option<&Value>], column: &str, data_type: &DataType) -> Result<ArrayRef> {
    let array: ArrayRef = match data_type {
        DataType::Null => Arc::new(NullArray::new(values.len())),

        DataType::Utf8 => Arc::new(
            values
                .iter()
                .map(|v| v.map(coerce_string))
                .collect::<StringArray>(),
        ),

        DataType::Int64 => Arc::new(
            values
                .iter()
                .map(|v| v.and_then(coerce_i64))
                .collect::<Int64Array>(),
        ),

        DataType::Int32 => Arc::new(
            values
                .iter()
                .map(|v| v.and_then(coerce_i64).and_then(|n| i32::try_from(n).ok()))
                .collect::<Int32Array>(),
        ),

        DataType::Float64 => Arc::new(
            values
                .iter()
                .map(|v| v.and_then(coerce_f64))
                .collect::<Float64Array>(),
        ),

        DataType::Boolean => Arc::new(
            values
                .iter()
                .map(|v| v.and_then(coerce_bool))
                .collect::<BooleanArray>(),
        ),

        DataType::Timestamp(TimeUnit::Millisecond, None) => Arc::new(
            values
                .iter()
                .map(|v| v.and_then(coerce_i64))
                .collect::<TimestampMillisecondArray>(),
        ),

        other => {
            return Err(Error::ColumnType {
                column: column.to_string(),
                expected: "a JSON-compatible type".to_string(),
                actual: other.to_string(),
            })
        }
    };

    Ok(array)
}

fn coerce_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn coerce_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < 9.0e18)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Convert an Arrow RecordBatch to JSON records
///
/// Returns a vector of JSON objects, one per row in the batch. Timestamps
/// are rendered as epoch milliseconds.
pub fn batch_to_json(batch: &RecordBatch) -> Result<Vec<Value>> {
    let schema = batch.schema();
    let mut records = Vec::with_capacity(batch.num_rows());

    for row in 0..batch.num_rows() {
        let mut record = Map::new();
        for (field, column) in schema.fields().iter().zip(batch.columns()) {
            let value = array_value_to_json(column.as_ref(), field.name(), row)?;
            record.insert(field.name().clone(), value);
        }
        records.push(Value::Object(record));
    }

    Ok(records)
}

fn array_value_to_json(array: &dyn Array, column: &str, row: usize) -> Result<Value> {
    if array.is_null(row) {
        return Ok(Value::Null);
    }

    let value = match array.data_type() {
        DataType::Utf8 => array
            .as_string_opt::<i32>()
            .map(|a| Value::String(a.value(row).to_string())),
        DataType::Int64 => array
            .as_primitive_opt::<Int64Type>()
            .map(|a| Value::Number(a.value(row).into())),
        DataType::Int32 => array
            .as_primitive_opt::<Int32Type>()
            .map(|a| Value::Number(a.value(row).into())),
        DataType::Float64 => array
            .as_primitive_opt::<Float64Type>()
            .map(|a| Number::from_f64(a.value(row)).map_or(Value::Null, Value::Number)),
        DataType::Boolean => array.as_boolean_opt().map(|a| Value::Bool(a.value(row))),
        DataType::Timestamp(TimeUnit::Millisecond, _) => array
            .as_primitive_opt::<TimestampMillisecondType>()
            .map(|a| Value::Number(a.value(row).into())),
        _ => None,
    };

    value.ok_or_else(|| Error::ColumnType {
        column: column.to_string(),
        expected: "a JSON-compatible type".to_string(),
        actual: array.data_type().to_string(),
    })
}
