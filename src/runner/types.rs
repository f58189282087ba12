//! Result records produced by the execution loop

use crate::error::ParserError;
use crate::planner::Task;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Outcome of reviewing one regulation document
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Regulation {
    /// Internal regulation file name (path not required)
    pub file_name: String,

    /// Original regulation text (empty when not updated)
    pub original_text: String,

    /// Updated regulation text (empty when not updated)
    pub updated_text: String,

    /// Whether the regulation has been updated
    pub is_updated: bool,

    /// The reason for reviewing this regulation (Japanese)
    pub hypothesis: String,

    /// Reason for whether the regulation was updated (Japanese)
    pub reason: String,
}

impl Regulation {
    /// Coerce an extracted payload into a record that satisfies the
    /// update invariant
    pub fn from_payload(payload: &Value) -> Result<Self, ParserError> {
        // serde would otherwise read a six-element array by position
        if !payload.is_object() {
            return Err(ParserError::Inconsistent(
                "regulation payload is not a JSON object".to_string(),
            ));
        }
        let mut regulation: Regulation = serde_json::from_value(payload.clone())?;

        if !regulation.is_updated {
            regulation.original_text.clear();
            regulation.updated_text.clear();
            return Ok(regulation);
        }

        if regulation.original_text.trim().is_empty() {
            return Err(ParserError::Inconsistent(
                "is_updated is true but original_text is empty".to_string(),
            ));
        }
        if regulation.updated_text.trim().is_empty() {
            return Err(ParserError::Inconsistent(
                "is_updated is true but updated_text is empty".to_string(),
            ));
        }
        if regulation.updated_text.trim() == regulation.original_text.trim() {
            return Err(ParserError::Inconsistent(
                "is_updated is true but updated_text equals original_text".to_string(),
            ));
        }
        Ok(regulation)
    }
}

/// JSON Schema of [`Regulation`], embedded in edit prompts
pub fn regulation_schema() -> String {
    let schema = schemars::schema_for!(Regulation);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}

/// A task whose document could not be retrieved
#[derive(Debug, Clone, Serialize)]
pub struct FailedTask {
    pub task: Task,
    pub error: String,
}

/// A task lost to a decision-service or coercion fault
#[derive(Debug, Clone, Serialize)]
pub struct DroppedTask {
    pub task: Task,
    pub reason: String,
}

/// How the loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    /// Pending queue emptied
    Drained,
    /// Wall-clock budget spent with tasks still pending
    TimedOut,
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionStatus::Drained => write!(f, "drained"),
            ExecutionStatus::TimedOut => write!(f, "timed_out"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExecutionReport {
    pub run_id: Uuid,
    pub status: ExecutionStatus,
    /// Results in completion order
    pub regulations: Vec<Regulation>,
    pub completed: Vec<Task>,
    pub failed: Vec<FailedTask>,
    pub dropped: Vec<DroppedTask>,
    /// Still pending when the loop stopped
    pub remaining: Vec<Task>,
    /// Replanned tasks refused by the enqueue cap
    pub discarded: Vec<Task>,
    pub elapsed_secs: f64,
}

impl ExecutionReport {
    pub fn updated_count(&self) -> usize {
        self.regulations.iter().filter(|r| r.is_updated).count()
    }

    pub fn timed_out(&self) -> bool {
        self.status == ExecutionStatus::TimedOut
    }
}
