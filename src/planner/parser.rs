//! Conversion of extracted JSON payloads into tasks

use crate::error::PlannerError;
use serde_json::Value;
use tracing::warn;

use super::types::Task;

/// Convert a structured payload into tasks.
///
/// Accepts a single object or a list of objects. Missing or non-string fields
/// become empty strings; list entries that are not objects are skipped.
pub fn parse_tasks(payload: &Value) -> Result<Vec<Task>, PlannerError> {
    match payload {
        Value::Array(items) => Ok(items
            .iter()
            .enumerate()
            .filter_map(|(idx, item)| match item {
                Value::Object(_) => Some(task_from_object(item)),
                other => {
                    warn!("Skipping task entry {}: expected an object, got {}", idx, other);
                    None
                }
            })
            .collect()),
        Value::Object(_) => Ok(vec![task_from_object(payload)]),
        other => Err(PlannerError::UnexpectedShape(kind_of(other).to_string())),
    }
}

fn task_from_object(value: &Value) -> Task {
    Task {
        file_name: string_field(value, "file_name"),
        check_reason: string_field(value, "check_reason"),
    }
}

fn string_field(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
