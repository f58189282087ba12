//! Types for the review worklist

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One document to inspect and the reason for inspecting it
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct Task {
    /// Internal regulation file name (path not required)
    #[serde(default)]
    pub file_name: String,

    /// Why the contents of this file need to be checked
    #[serde(default)]
    pub check_reason: String,
}

impl Task {
    pub fn new(file_name: impl Into<String>, check_reason: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            check_reason: check_reason.into(),
        }
    }
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.file_name, self.check_reason)
    }
}

/// JSON Schema of [`Task`], embedded in planning prompts
pub fn task_schema() -> String {
    let schema = schemars::schema_for!(Task);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_task() {
        let json = r#"{"file_name": "22_telework.txt", "check_reason": "mentions core time"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task, Task::new("22_telework.txt", "mentions core time"));
    }

    #[test]
    fn test_schema_lists_fields() {
        let schema = task_schema();
        assert!(schema.contains("file_name"));
        assert!(schema.contains("check_reason"));
    }
}
