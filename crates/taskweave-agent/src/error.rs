//! Error types for planning and running task plans.

use taskweave_core::{ExecutionError, TaskError, TaskId};
use thiserror::Error;

/// Errors raised outside task execution: planning, configuration and
/// serialization.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The planner could not turn the objective into tasks.
    #[error("Planning failed: {0}")]
    PlanningFailed(String),

    /// An environment variable held an unusable value.
    #[error("Invalid environment variable '{key}': {message}")]
    InvalidConfig { key: String, message: String },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AgentError {
    /// Get the error code suitable for logging or reporting.
    pub fn error_code(&self) -> &'static str {
        match self {
            AgentError::PlanningFailed(_) => "PLANNING_FAILED",
            AgentError::InvalidConfig { .. } => "INVALID_CONFIG",
            AgentError::SerializationError(_) => "SERIALIZATION_ERROR",
            AgentError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// Result type for agent operations.
pub type AgentResult<T> = Result<T, AgentError>;

impl From<serde_json::Error> for AgentError {
    fn from(err: serde_json::Error) -> Self {
        AgentError::SerializationError(err.to_string())
    }
}

/// Run-level failure: the first task that failed, wrapped with its id.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("task {task_id} failed: {source}")]
    TaskFailed {
        task_id: TaskId,
        #[source]
        source: ExecutionError,
    },

    /// A task could not change state.
    #[error(transparent)]
    State(#[from] TaskError),
}

impl RunError {
    /// Id of the failed task, if a task failed.
    pub fn task_id(&self) -> Option<&TaskId> {
        match self {
            RunError::TaskFailed { task_id, .. } => Some(task_id),
            RunError::State(_) => None,
        }
    }

    /// The dispatch error behind a task failure.
    pub fn execution_error(&self) -> Option<&ExecutionError> {
        match self {
            RunError::TaskFailed { source, .. } => Some(source),
            RunError::State(_) => None,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RunError::TaskFailed { source, .. } => source.error_code(),
            RunError::State(_) => "TASK_STATE",
        }
    }
}
