//! # Taskweave Core
//!
//! Core types for the Taskweave orchestrator: the task model, the tool
//! contract, and the error taxonomy shared by every other crate.

pub mod error;
pub mod identifiers;
pub mod task;
pub mod tool;

pub use error::{ExecutionError, ExecutionResult, TaskError};
pub use identifiers::{IdValidationError, TaskId};
pub use task::{Parameters, Task, TaskKind, TaskStatus};
pub use tool::{FailureReason, Tool, ToolOutcome};
