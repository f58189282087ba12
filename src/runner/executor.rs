use crate::config::RetryConfig;
use crate::corpus::RegulationSummary;
use crate::error::{ExecutionError, ProviderError};
use crate::parser::extract_structured_block;
use crate::planner::{parse_tasks, task_schema, Task};
use crate::prompt::render;
use crate::provider::Runner;
use std::collections::VecDeque;
use tracing::{debug, warn};

use super::retry::retry_transient;
use super::types::{regulation_schema, Regulation};

const EXECUTE_PROMPT: &str = include_str!("../../prompts/execute.md");
const REPLAN_PROMPT: &str = include_str!("../../prompts/replan.md");

const EDIT_MESSAGE: &str = "Please update the internal regulation.";
const REPLAN_MESSAGE: &str =
    "Please replan whether further internal regulation reviews are necessary.";

/// Shared, read-only inputs of every decision request in a run
pub struct DecisionContext<'a> {
    pub runner: &'a dyn Runner,
    pub retry: &'a RetryConfig,
    pub query: &'a str,
    pub summary: &'a RegulationSummary,
}

/// Result of asking for an edit decision on one document
#[derive(Debug)]
pub enum EditOutcome {
    Decided(Regulation),
    /// The service failed or answered with an unusable record
    Dropped(String),
}

impl DecisionContext<'_> {
    async fn submit(&self, system: &str, message: &str) -> Result<String, ProviderError> {
        retry_transient(self.retry, || self.runner.submit(system, message, &[]))
            .await
            .map(|output| output.content)
    }

    pub fn edit_prompt(&self, task: &Task, regulation_text: &str) -> String {
        render(
            EXECUTE_PROMPT,
            &[
                ("SCHEMA", regulation_schema().as_str()),
                ("QUERY", self.query),
                ("CHECK_REASON", task.check_reason.as_str()),
                ("FILE_NAME", task.file_name.as_str()),
                ("REGULATION_TEXT", regulation_text),
            ],
        )
    }

    pub fn replan_prompt(
        &self,
        current: &str,
        regulations: &[Regulation],
        pending: &VecDeque<Task>,
    ) -> String {
        let regulations_json = serde_json::to_string_pretty(regulations).unwrap_or_default();
        let pending_json = serde_json::to_string_pretty(pending).unwrap_or_default();
        render(
            REPLAN_PROMPT,
            &[
                ("SCHEMA", task_schema().as_str()),
                ("QUERY", self.query),
                ("REGULATIONS", regulations_json.as_str()),
                ("PENDING", pending_json.as_str()),
                ("SUMMARY", self.summary.content.as_str()),
                ("CURRENT", current),
            ],
        )
    }

    /// Ask whether and how the document must change.
    ///
    /// Only a response without any structured block is an error; transport
    /// and coercion faults come back as [`EditOutcome::Dropped`].
    pub async fn request_edit(
        &self,
        task: &Task,
        regulation_text: &str,
    ) -> Result<EditOutcome, ExecutionError> {
        let system = self.edit_prompt(task, regulation_text);

        let content = match self.submit(&system, EDIT_MESSAGE).await {
            Ok(content) => content,
            Err(e) => {
                warn!("Edit decision for '{}' failed: {}", task.file_name, e);
                return Ok(EditOutcome::Dropped(e.to_string()));
            }
        };
        debug!("Edit decision for '{}':\n{}", task.file_name, content);

        let payload = extract_structured_block(&content).ok_or_else(|| {
            ExecutionError::MissingStructuredBlock {
                stage: "edit",
                file_name: task.file_name.clone(),
            }
        })?;

        match Regulation::from_payload(&payload) {
            Ok(regulation) => Ok(EditOutcome::Decided(regulation)),
            Err(e) => {
                warn!(
                    "Could not convert edit decision for '{}' into a regulation: {}",
                    task.file_name, e
                );
                Ok(EditOutcome::Dropped(e.to_string()))
            }
        }
    }

    /// Ask for follow-up tasks after `current` was reviewed
    pub async fn request_replan(
        &self,
        current: &str,
        regulations: &[Regulation],
        pending: &VecDeque<Task>,
    ) -> Result<Vec<Task>, ExecutionError> {
        let system = self.replan_prompt(current, regulations, pending);

        let content = match self.submit(&system, REPLAN_MESSAGE).await {
            Ok(content) => content,
            Err(e) => {
                warn!("Replanning after '{}' failed: {}", current, e);
                return Ok(Vec::new());
            }
        };
        debug!("Replanning after '{}':\n{}", current, content);

        let payload = extract_structured_block(&content).ok_or_else(|| {
            ExecutionError::MissingStructuredBlock {
                stage: "replanning",
                file_name: current.to_string(),
            }
        })?;

        match parse_tasks(&payload) {
            Ok(tasks) => Ok(tasks),
            Err(e) => {
                warn!("Ignoring replanning payload after '{}': {}", current, e);
                Ok(Vec::new())
            }
        }
    }
}
