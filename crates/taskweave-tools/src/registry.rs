use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use taskweave_core::{ExecutionError, ExecutionResult, FailureReason, Parameters, Tool};
use taskweave_observability::{GenAiOperation, record_error, record_json};
use tracing::Instrument;
use tracing::field::Empty;
use uuid::Uuid;

/// Name-indexed collection of tools.
///
/// `ToolRegistry` keeps tools in a concurrent map, so registration may race
/// with lookups from running orchestrators. Share it between runs behind an
/// `Arc`.
///
/// # Example
///
/// ```rust
/// use taskweave_tools::{CalculatorTool, ToolRegistry, WeatherTool};
///
/// let registry = ToolRegistry::new()
///     .with_tool(WeatherTool::new())
///     .with_tool(CalculatorTool::new());
///
/// assert!(registry.lookup("get_weather").is_some());
/// assert!(registry.lookup("translator").is_none());
/// ```
#[derive(Default)]
pub struct ToolRegistry {
    tools: DashMap<String, Arc<dyn Tool>>,
    default_timeout: Option<Duration>,
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tool_names())
            .field("default_timeout", &self.default_timeout)
            .finish()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-loaded with the standard weather and calculator tools.
    pub fn with_standard_tools() -> Self {
        Self::new()
            .with_tool(crate::WeatherTool::new())
            .with_tool(crate::CalculatorTool::new())
    }

    /// Add a tool using the builder pattern.
    pub fn with_tool<T: Tool + 'static>(self, tool: T) -> Self {
        self.register(tool);
        self
    }

    /// Upper bound applied to tools that do not declare their own timeout.
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = Some(timeout);
        self
    }

    /// Register a tool under its declared name.
    ///
    /// The last registration for a name wins; the displaced tool is
    /// returned.
    pub fn register<T: Tool + 'static>(&self, tool: T) -> Option<Arc<dyn Tool>> {
        self.register_arc(Arc::new(tool))
    }

    /// Register an already shared tool.
    pub fn register_arc(&self, tool: Arc<dyn Tool>) -> Option<Arc<dyn Tool>> {
        let name = tool.name().to_string();
        let previous = self.tools.insert(name.clone(), tool);
        if previous.is_some() {
            tracing::debug!(tool = %name, "Replaced registered tool");
        }
        previous
    }

    /// Find a tool by name. Never invokes it.
    pub fn lookup(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).map(|entry| Arc::clone(entry.value()))
    }

    /// Names of every registered tool, sorted.
    pub fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Look up `name` and execute it inside a `tool.execute` span.
    ///
    /// The span is a child of whatever span is current, so invocations made
    /// while a task span is entered nest under that task.
    pub async fn invoke(&self, name: &str, params: Parameters) -> ExecutionResult<Value> {
        let tool = self
            .lookup(name)
            .ok_or_else(|| ExecutionError::ToolNotFound {
                name: name.to_string(),
            })?;

        let span = tracing::info_span!(
            "tool.execute",
            gen_ai.operation.name = GenAiOperation::ExecuteTool.as_str(),
            gen_ai.tool.name = name,
            gen_ai.tool.call.id = %Uuid::new_v4(),
            gen_ai.tool.description = tool.description(),
            gen_ai.tool.params = Empty,
            gen_ai.tool.result = Empty,
            otel.status_code = Empty,
            otel.status_message = Empty,
        );
        record_json(&span, "gen_ai.tool.params", &params);

        let limit = tool.timeout().or(self.default_timeout);
        let outcome = async {
            match limit {
                Some(limit) => match tokio::time::timeout(limit, tool.execute(params)).await {
                    Ok(outcome) => outcome,
                    Err(_) => Err(FailureReason::Timeout {
                        operation: name.to_string(),
                        limit_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                    }),
                },
                None => tool.execute(params).await,
            }
        }
        .instrument(span.clone())
        .await;

        match outcome {
            Ok(value) => {
                record_json(&span, "gen_ai.tool.result", &value);
                Ok(value)
            }
            Err(reason) => {
                let error = ExecutionError::ToolExecutionFailed {
                    tool: name.to_string(),
                    reason,
                };
                record_error(&span, &error);
                Err(error)
            }
        }
    }
}
