//! Projection of an assembled row array into records (`$[*]`).

use serde_json::Value;

use crate::definition::Record;
use crate::error::StreamError;

/// Split the serialized rows of one stream into records, one per array
/// element, in order.
///
/// # Errors
///
/// Returns [`StreamError::Structural`] if `assembled` is not an array or an
/// element is not an object.
pub fn project_rows(stream: &str, assembled: Value) -> Result<Vec<Record>, StreamError> {
    let items = match assembled {
        Value::Array(items) => items,
        other => {
            return Err(StreamError::Structural {
                context: stream.to_string(),
                reason: format!("expected an array of rows, got {}", kind_of(&other)),
            });
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(record) => Ok(record),
            other => Err(StreamError::Structural {
                context: format!("{stream} row {index}"),
                reason: format!("expected an object, got {}", kind_of(&other)),
            }),
        })
        .collect()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
