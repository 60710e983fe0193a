//! Run state: one objective, its plan and the results gathered so far.

use serde::Serialize;
use serde_json::Value;
use taskweave_core::{Task, TaskStatus};

/// An objective with its ordered task list and accumulated results.
///
/// Created by [`Orchestrator::plan`](crate::Orchestrator::plan) and consumed
/// by [`Orchestrator::execute`](crate::Orchestrator::execute). Never
/// persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Run {
    objective: String,
    pub(crate) tasks: Vec<Task>,
    pub(crate) results: Vec<Value>,
}

impl Run {
    /// Wrap an existing plan, e.g. tasks injected by a test.
    pub fn new(objective: impl Into<String>, tasks: Vec<Task>) -> Self {
        Self {
            objective: objective.into(),
            tasks,
            results: Vec::new(),
        }
    }

    pub fn objective(&self) -> &str {
        &self.objective
    }

    /// Tasks in execution order, with their current status and results.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Results of completed non-summary tasks, in completion order.
    pub fn results(&self) -> &[Value] {
        &self.results
    }

    pub fn count_with_status(&self, status: TaskStatus) -> usize {
        self.tasks.iter().filter(|t| t.status() == status).count()
    }

    pub fn completed_count(&self) -> usize {
        self.count_with_status(TaskStatus::Completed)
    }

    pub fn pending_count(&self) -> usize {
        self.count_with_status(TaskStatus::Pending)
    }

    /// The first failed task, if any.
    pub fn failed_task(&self) -> Option<&Task> {
        self.tasks
            .iter()
            .find(|t| t.status() == TaskStatus::Failed)
    }
}

/// Outcome of a successful execution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub completed_tasks: usize,
    pub results: Vec<Value>,
    /// Result of the last summarize task, if the plan had one.
    pub summary: Option<Value>,
}
