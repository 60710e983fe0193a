//! Error Types
//!
//! Dispatch-time errors raised while executing a single task, and errors
//! for illegal task state transitions. Run-level wrapping (which task
//! failed) lives with the orchestrator.

use crate::identifiers::TaskId;
use crate::task::TaskStatus;
use crate::tool::FailureReason;
use thiserror::Error;

/// Errors that can occur while dispatching one task.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExecutionError {
    /// A tool-call task has no usable `tool` parameter.
    #[error("missing tool name")]
    MissingToolName,

    /// The referenced tool is not registered.
    #[error("tool not found: {name}")]
    ToolNotFound { name: String },

    /// The tool ran and reported a failure.
    #[error("tool '{tool}' execution failed: {reason}")]
    ToolExecutionFailed { tool: String, reason: FailureReason },

    /// The task kind has no dispatch rule in this executor.
    #[error("unknown task type: {kind}")]
    UnknownTaskKind { kind: String },
}

impl ExecutionError {
    /// Get the error code suitable for logging or span attributes.
    pub fn error_code(&self) -> &'static str {
        match self {
            ExecutionError::MissingToolName => "MISSING_TOOL_NAME",
            ExecutionError::ToolNotFound { .. } => "TOOL_NOT_FOUND",
            ExecutionError::ToolExecutionFailed { .. } => "TOOL_EXECUTION_FAILED",
            ExecutionError::UnknownTaskKind { .. } => "UNKNOWN_TASK_KIND",
        }
    }

    /// Failure reason reported by the tool, when the tool itself failed.
    pub fn failure_reason(&self) -> Option<&FailureReason> {
        match self {
            ExecutionError::ToolExecutionFailed { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

/// Result type alias for task dispatch.
pub type ExecutionResult<T> = Result<T, ExecutionError>;

/// Illegal task state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    /// The task already left `Pending`.
    #[error("task {task_id} already settled as {status}")]
    AlreadySettled { task_id: TaskId, status: TaskStatus },

    /// A deserialized task carries a result that contradicts its status.
    #[error("task {task_id} is {status} but its result field disagrees")]
    InconsistentResult { task_id: TaskId, status: TaskStatus },
}
