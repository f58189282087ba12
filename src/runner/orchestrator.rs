use crate::config::RetryConfig;
use crate::corpus::{DocumentRetriever, RegulationSummary};
use crate::error::ExecutionError;
use crate::planner::Task;
use crate::provider::Runner;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::executor::{DecisionContext, EditOutcome};
use super::queue::TaskQueue;
use super::types::{ExecutionReport, ExecutionStatus};

#[derive(Debug, Clone)]
pub struct ExecuteOptions {
    /// Wall-clock budget, polled between tasks
    pub timeout: Duration,
    /// Cap on tasks ever enqueued, initial plan included
    pub max_enqueued_tasks: Option<usize>,
}

/// Drains the review worklist one task at a time, growing it from the
/// replanning decisions, until it is empty or the budget is spent
pub struct Orchestrator {
    runner: Arc<dyn Runner>,
    retriever: Arc<dyn DocumentRetriever>,
    retry: RetryConfig,
    options: ExecuteOptions,
}

impl Orchestrator {
    pub fn new(
        runner: Arc<dyn Runner>,
        retriever: Arc<dyn DocumentRetriever>,
        retry: RetryConfig,
        options: ExecuteOptions,
    ) -> Self {
        Self {
            runner,
            retriever,
            retry,
            options,
        }
    }

    pub async fn run(
        &self,
        query: &str,
        summary: &RegulationSummary,
        tasks: Vec<Task>,
    ) -> Result<ExecutionReport, ExecutionError> {
        let run_id = Uuid::new_v4();
        self.drain(run_id, query, summary, tasks)
            .instrument(info_span!("execute", %run_id))
            .await
    }

    async fn drain(
        &self,
        run_id: Uuid,
        query: &str,
        summary: &RegulationSummary,
        tasks: Vec<Task>,
    ) -> Result<ExecutionReport, ExecutionError> {
        let start = Instant::now();
        let ctx = DecisionContext {
            runner: self.runner.as_ref(),
            retry: &self.retry,
            query,
            summary,
        };

        let mut queue = TaskQueue::new(tasks, self.options.max_enqueued_tasks);
        let mut regulations = Vec::new();

        info!(
            "Executing {} task(s) with a {:?} budget via {}",
            queue.pending().len(),
            self.options.timeout,
            self.runner.name()
        );

        let status = loop {
            if queue.is_empty() {
                break ExecutionStatus::Drained;
            }

            if start.elapsed() >= self.options.timeout {
                warn!(
                    "Timeout reached after {:?}: {} completed, {} remaining",
                    self.options.timeout,
                    queue.completed_count(),
                    queue.pending().len()
                );
                break ExecutionStatus::TimedOut;
            }

            let Some(task) = queue.pop() else {
                break ExecutionStatus::Drained;
            };
            info!(
                "Reviewing {} ({} remaining, {} completed)",
                task.file_name,
                queue.pending().len(),
                queue.completed_count()
            );

            let text = match self.retriever.retrieve(&task.file_name) {
                Ok(text) => text,
                Err(e) => {
                    warn!("Could not retrieve '{}': {}", task.file_name, e);
                    queue.fail(task, e.to_string());
                    continue;
                }
            };

            let regulation = match ctx.request_edit(&task, &text).await? {
                EditOutcome::Decided(regulation) => regulation,
                EditOutcome::Dropped(reason) => {
                    queue.drop_task(task, reason);
                    continue;
                }
            };
            info!(
                "{}: {}",
                regulation.file_name,
                if regulation.is_updated {
                    "updated"
                } else {
                    "no change"
                }
            );
            regulations.push(regulation);

            let current = task.file_name.clone();
            queue.complete(task);

            let new_tasks = ctx
                .request_replan(&current, &regulations, queue.pending())
                .await?;
            if new_tasks.is_empty() {
                debug!("No additional tasks after {}", current);
            } else {
                info!("Replanning after {} added {} task(s)", current, new_tasks.len());
                queue.enqueue(new_tasks);
            }
        };

        let parts = queue.into_parts();
        info!(
            "Execution {} in {:.1}s: {} reviewed, {} failed, {} dropped, {} remaining",
            status,
            start.elapsed().as_secs_f64(),
            parts.completed.len(),
            parts.failed.len(),
            parts.dropped.len(),
            parts.remaining.len()
        );

        Ok(ExecutionReport {
            run_id,
            status,
            regulations,
            completed: parts.completed,
            failed: parts.failed,
            dropped: parts.dropped,
            remaining: parts.remaining,
            discarded: parts.discarded,
            elapsed_secs: start.elapsed().as_secs_f64(),
        })
    }
}
