//! JSON object stream decoder

use crate::error::{Error, Result};
use serde_json::{Deserializer, Value};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Decode every top-level JSON object in `body`
///
/// Objects may be separated by newlines (JSON Lines) or any other
/// whitespace, so both one-record-per-line and one-record-per-file corpora
/// decode the same way. A top-level array contributes each of its elements,
/// which must themselves be objects. `path` is only used in error messages.
pub fn decode_records(path: &str, body: &[u8]) -> Result<Vec<Value>> {
    let body = body.strip_prefix(UTF8_BOM).unwrap_or(body);
    let mut records = Vec::new();

    for (index, item) in Deserializer::from_slice(body).into_iter::<Value>().enumerate() {
        let value = item.map_err(|e| {
            Error::decode(
                path,
                format!("line {} column {}: {e}", e.line(), e.column()),
            )
        })?;

        match value {
            Value::Object(_) => records.push(value),
            Value::Array(elements) => {
                for (offset, element) in elements.into_iter().enumerate() {
                    if !element.is_object() {
                        return Err(not_an_object(
                            path,
                            &format!("record {} element {}", index + 1, offset + 1),
                            &element,
                        ));
                    }
                    records.push(element);
                }
            }
            other => {
                return Err(not_an_object(
                    path,
                    &format!("record {}", index + 1),
                    &other,
                ))
            }
        }
    }

    Ok(records)
}

fn not_an_object(path: &str, position: &str, value: &Value) -> Error {
    Error::decode(
        path,
        format!("{position} is a JSON {}, expected an object", json_kind(value)),
    )
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
