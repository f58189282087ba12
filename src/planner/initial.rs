//! Initial plan: user request + regulation summary -> ordered task list

use crate::config::RetryConfig;
use crate::corpus::RegulationSummary;
use crate::error::PlannerError;
use crate::parser::extract_structured_block;
use crate::prompt::render;
use crate::provider::Runner;
use crate::runner::retry_transient;
use tracing::{debug, info};

use super::parser::parse_tasks;
use super::types::{task_schema, Task};

const PLAN_PROMPT: &str = include_str!("../../prompts/plan.md");

pub fn build_plan_prompt(summary: &RegulationSummary) -> String {
    render(
        PLAN_PROMPT,
        &[("SCHEMA", task_schema().as_str()), ("SUMMARY", summary.content.as_str())],
    )
}

/// Ask the decision service which documents to review first
pub async fn generate_init_plan(
    runner: &dyn Runner,
    retry: &RetryConfig,
    query: &str,
    summary: &RegulationSummary,
) -> Result<Vec<Task>, PlannerError> {
    if query.trim().is_empty() {
        return Err(PlannerError::EmptyQuery);
    }
    if summary.content.trim().is_empty() {
        return Err(PlannerError::EmptySummary);
    }

    let system = build_plan_prompt(summary);
    debug!("Planning system prompt:\n{}", system);

    let output = retry_transient(retry, || runner.submit(&system, query, &[])).await?;
    debug!("Planning response:\n{}", output.content);

    let payload =
        extract_structured_block(&output.content).ok_or(PlannerError::MissingStructuredBlock)?;
    let tasks = parse_tasks(&payload)?;

    info!("Initial plan has {} task(s)", tasks.len());
    Ok(tasks)
}
