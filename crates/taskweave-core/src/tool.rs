//! The tool contract.
//!
//! A tool is an external capability the executor can invoke by name. Any
//! type implementing [`Tool`] can be registered; the executor never needs
//! to know concrete tool types.

use crate::task::Parameters;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// Categorized failure reasons for tool execution.
///
/// This enum provides structured error information instead of plain strings,
/// making it easier to handle different failure types programmatically.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FailureReason {
    /// Invalid or malformed input provided to the tool
    InvalidInput {
        /// Description of what was invalid
        message: String,
    },
    /// A required parameter was absent
    MissingParameter {
        /// Name of the missing parameter
        name: String,
    },
    /// The input was well-formed but the operation is undefined for it
    Domain {
        /// Description of the domain error
        message: String,
    },
    /// Timeout exceeded
    Timeout {
        /// What operation timed out
        operation: String,
        /// Limit that was exceeded, in milliseconds
        limit_ms: u64,
    },
    /// Internal tool error or unexpected state
    Internal {
        /// Description of the internal error
        message: String,
    },
}

impl FailureReason {
    /// Get a human-readable error message
    pub fn message(&self) -> String {
        match self {
            FailureReason::InvalidInput { message } => format!("invalid input: {}", message),
            FailureReason::MissingParameter { name } => {
                format!("missing {} parameter", name)
            }
            FailureReason::Domain { message } => message.clone(),
            FailureReason::Timeout {
                operation,
                limit_ms,
            } => format!("{} timed out after {}ms", operation, limit_ms),
            FailureReason::Internal { message } => format!("internal error: {}", message),
        }
    }

    /// Stable short code, used as a span attribute.
    pub fn code(&self) -> &'static str {
        match self {
            FailureReason::InvalidInput { .. } => "invalid_input",
            FailureReason::MissingParameter { .. } => "missing_parameter",
            FailureReason::Domain { .. } => "domain",
            FailureReason::Timeout { .. } => "timeout",
            FailureReason::Internal { .. } => "internal",
        }
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for FailureReason {}

/// Outcome of a single tool invocation.
pub type ToolOutcome = Result<Value, FailureReason>;

/// Trait defining an external capability that the executor can invoke.
///
/// Tools are stateless with respect to a single invocation: no call may
/// depend on state left behind by an earlier call.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use serde_json::json;
/// use taskweave_core::{Parameters, Tool, ToolOutcome};
///
/// struct DoubleTool;
///
/// #[async_trait]
/// impl Tool for DoubleTool {
///     fn name(&self) -> &str {
///         "double"
///     }
///
///     fn description(&self) -> &str {
///         "Multiplies a number by 2"
///     }
///
///     async fn execute(&self, params: Parameters) -> ToolOutcome {
///         let n = params.require_f64("n")?;
///         Ok(json!({ "result": n * 2.0 }))
///     }
/// }
/// ```
#[async_trait]
pub trait Tool: Send + Sync {
    /// Returns the unique name identifier for this tool.
    ///
    /// The registry routes tool-call tasks by this name.
    fn name(&self) -> &str;

    /// Returns a human-readable description of the tool, recorded on
    /// tool spans.
    fn description(&self) -> &str;

    /// Execute the tool with the given parameters.
    async fn execute(&self, params: Parameters) -> ToolOutcome;

    /// Upper bound on a single invocation, if the tool declares one.
    ///
    /// `None` leaves the decision to the registry's default.
    fn timeout(&self) -> Option<Duration> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echoes its parameters"
        }

        async fn execute(&self, params: Parameters) -> ToolOutcome {
            Ok(params.into_value())
        }
    }

    #[test]
    fn test_tool_object_safety_and_defaults() {
        let tool: Box<dyn Tool> = Box::new(EchoTool);
        assert_eq!(tool.name(), "echo");
        assert!(tool.timeout().is_none());

        let out = tokio_test::block_on(tool.execute(Parameters::new().with("x", 1))).unwrap();
        assert_eq!(out, json!({"x": 1}));
    }

    #[test]
    fn test_failure_reason_messages() {
        let reason = FailureReason::Domain {
            message: "division by zero".to_string(),
        };
        assert_eq!(reason.to_string(), "division by zero");
        assert_eq!(reason.code(), "domain");

        let reason = FailureReason::MissingParameter {
            name: "city".to_string(),
        };
        assert_eq!(reason.to_string(), "missing city parameter");

        let reason = FailureReason::Timeout {
            operation: "get_weather".to_string(),
            limit_ms: 50,
        };
        assert!(reason.to_string().contains("50ms"));
    }

    #[test]
    fn test_failure_reason_serializes_tagged() {
        let reason = FailureReason::InvalidInput {
            message: "bad".to_string(),
        };
        let value = serde_json::to_value(&reason).unwrap();
        assert_eq!(value["type"], "invalid_input");
        assert_eq!(value["message"], "bad");
    }
}
