use crate::planner::Task;
use std::collections::VecDeque;
use tracing::warn;

use super::types::{DroppedTask, FailedTask};

/// FIFO worklist with the terminal buckets a popped task can land in.
///
/// A task leaves `pending` exactly once and ends up in exactly one of
/// `completed`, `failed` or `dropped`.
#[derive(Debug, Default)]
pub struct TaskQueue {
    pending: VecDeque<Task>,
    completed: Vec<Task>,
    failed: Vec<FailedTask>,
    dropped: Vec<DroppedTask>,
    discarded: Vec<Task>,
    enqueued: usize,
    limit: Option<usize>,
}

/// Terminal contents of a queue
#[derive(Debug, Default)]
pub struct QueueParts {
    pub completed: Vec<Task>,
    pub failed: Vec<FailedTask>,
    pub dropped: Vec<DroppedTask>,
    pub remaining: Vec<Task>,
    pub discarded: Vec<Task>,
}

impl TaskQueue {
    pub fn new(initial: Vec<Task>, limit: Option<usize>) -> Self {
        let mut queue = Self {
            limit,
            ..Self::default()
        };
        queue.enqueue(initial);
        queue
    }

    /// Append tasks to the tail in order. Returns how many the cap refused.
    pub fn enqueue(&mut self, tasks: Vec<Task>) -> usize {
        let mut refused = 0;
        for task in tasks {
            if self.limit.is_some_and(|limit| self.enqueued >= limit) {
                refused += 1;
                self.discarded.push(task);
                continue;
            }
            self.enqueued += 1;
            self.pending.push_back(task);
        }
        if refused > 0 {
            warn!(
                "Task cap of {} reached; discarded {} task(s)",
                self.limit.unwrap_or_default(),
                refused
            );
        }
        refused
    }

    pub fn pop(&mut self) -> Option<Task> {
        self.pending.pop_front()
    }

    pub fn complete(&mut self, task: Task) {
        self.completed.push(task);
    }

    pub fn fail(&mut self, task: Task, error: String) {
        self.failed.push(FailedTask { task, error });
    }

    pub fn drop_task(&mut self, task: Task, reason: String) {
        self.dropped.push(DroppedTask { task, reason });
    }

    pub fn pending(&self) -> &VecDeque<Task> {
        &self.pending
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    pub fn into_parts(self) -> QueueParts {
        QueueParts {
            completed: self.completed,
            failed: self.failed,
            dropped: self.dropped,
            remaining: self.pending.into_iter().collect(),
            discarded: self.discarded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tasks(names: &[&str]) -> Vec<Task> {
        names.iter().map(|n| Task::new(*n, "reason")).collect()
    }

    #[test]
    fn test_fifo_with_appended_tasks() {
        let mut queue = TaskQueue::new(tasks(&["a", "b"]), None);
        let first = queue.pop().unwrap();
        queue.enqueue(tasks(&["c", "d"]));
        let order: Vec<_> = std::iter::from_fn(|| queue.pop())
            .map(|t| t.file_name)
            .collect();
        assert_eq!(first.file_name, "a");
        assert_eq!(order, vec!["b", "c", "d"]);
    }

    #[test]
    fn test_buckets_are_disjoint() {
        let mut queue = TaskQueue::new(tasks(&["a", "b", "c", "d"]), None);
        let a = queue.pop().unwrap();
        queue.complete(a);
        let b = queue.pop().unwrap();
        queue.fail(b, "missing".to_string());
        let c = queue.pop().unwrap();
        queue.drop_task(c, "transport".to_string());

        let parts = queue.into_parts();
        assert_eq!(parts.completed.len(), 1);
        assert_eq!(parts.failed[0].task.file_name, "b");
        assert_eq!(parts.dropped[0].task.file_name, "c");
        assert_eq!(parts.remaining, tasks(&["d"]));
    }

    #[test]
    fn test_cap_counts_every_enqueue() {
        let mut queue = TaskQueue::new(tasks(&["a", "b"]), Some(3));
        queue.pop();
        assert_eq!(queue.enqueue(tasks(&["c", "d", "e"])), 2);

        let parts = queue.into_parts();
        assert_eq!(parts.remaining, tasks(&["b", "c"]));
        assert_eq!(parts.discarded, tasks(&["d", "e"]));
    }

    #[test]
    fn test_no_deduplication() {
        let mut queue = TaskQueue::new(tasks(&["a"]), None);
        queue.enqueue(tasks(&["a"]));
        assert_eq!(queue.pending().len(), 2);
    }
}
