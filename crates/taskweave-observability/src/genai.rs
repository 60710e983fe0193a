//! GenAI Span Conventions
//!
//! Attribute values from the OpenTelemetry GenAI semantic conventions used
//! by Taskweave spans. Field *names* are written inline at each span site
//! (`gen_ai.operation.name`, `gen_ai.tool.name`, ...) because `tracing`
//! requires them to be literal; this module keeps the *values* consistent.

use serde_json::json;
use std::fmt;

/// `gen_ai.provider.name` reported by the simulated model calls
pub const PROVIDER_OPENAI: &str = "openai";

/// Model name reported by the simulated chat calls
pub const SIMULATED_MODEL: &str = "gpt-3.5-turbo";

/// `gen_ai.operation.name` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenAiOperation {
    Chat,
    CreateAgent,
    InvokeAgent,
    ExecuteTool,
}

impl GenAiOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenAiOperation::Chat => "chat",
            GenAiOperation::CreateAgent => "create_agent",
            GenAiOperation::InvokeAgent => "invoke_agent",
            GenAiOperation::ExecuteTool => "execute_tool",
        }
    }
}

impl fmt::Display for GenAiOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `[{"role": ..., "content": ...}]`, the shape of
/// `gen_ai.input.messages` / `gen_ai.output.messages`.
pub fn single_message(role: &str, content: &str) -> String {
    json!([{ "role": role, "content": content }]).to_string()
}

/// User message wrapper for `gen_ai.input.messages`.
pub fn user_message(content: &str) -> String {
    single_message("user", content)
}

/// Assistant message wrapper for `gen_ai.output.messages`.
pub fn assistant_message(content: &str) -> String {
    single_message("assistant", content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_names() {
        assert_eq!(GenAiOperation::Chat.as_str(), "chat");
        assert_eq!(GenAiOperation::ExecuteTool.to_string(), "execute_tool");
    }

    #[test]
    fn test_messages_escape_content() {
        let message = user_message("say \"hi\"");
        let parsed: serde_json::Value = serde_json::from_str(&message).unwrap();
        assert_eq!(parsed[0]["role"], "user");
        assert_eq!(parsed[0]["content"], "say \"hi\"");
    }
}
