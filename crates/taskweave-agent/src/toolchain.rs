//! Tool chain: a simulated model call picks tools, then each is invoked.
//!
//! Everything runs under one `tool_chain.run` root span so the model call
//! and every `tool.execute` share a trace. Unlike the orchestrator this is
//! best effort: a failing tool is logged and skipped.

use crate::chat::{model_call_span, record_model_response};
use crate::planner::{CALCULATOR_TOOL, KeywordPlanner, WEATHER_TOOL};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use taskweave_core::Parameters;
use taskweave_observability::genai::user_message;
use taskweave_tools::ToolRegistry;
use tracing::instrument::WithSubscriber;
use tracing::{Dispatch, Instrument};
use uuid::Uuid;

/// Default simulated model latency for the tool decision.
pub const MODEL_LATENCY: Duration = Duration::from_millis(30);

/// A tool the simulated model decided to call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolChoice {
    pub name: String,
    pub description: String,
}

/// Simulated model output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelResponse {
    pub role: String,
    pub content: String,
    pub tools: Vec<ToolChoice>,
}

/// Runs a message through the simulated model and the chosen tools.
#[derive(Debug, Clone)]
pub struct ToolChainService {
    registry: Arc<ToolRegistry>,
    planner: KeywordPlanner,
    latency: Duration,
    dispatch: Option<Dispatch>,
}

impl ToolChainService {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            planner: KeywordPlanner::new(),
            latency: MODEL_LATENCY,
            dispatch: None,
        }
    }

    /// Planner whose extractors derive tool parameters from the message.
    pub fn with_planner(mut self, planner: KeywordPlanner) -> Self {
        self.planner = planner;
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Where spans go. Defaults to the current dispatcher.
    pub fn dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = Some(dispatch);
        self
    }

    /// Simulated model call inside a `chat-model.call` span. Chooses every
    /// registered tool.
    pub async fn simulate_model_call(&self, message: &str) -> ModelResponse {
        match &self.dispatch {
            Some(dispatch) => {
                self.model_call_traced(message)
                    .with_subscriber(dispatch.clone())
                    .await
            }
            None => self.model_call_traced(message).await,
        }
    }

    async fn model_call_traced(&self, message: &str) -> ModelResponse {
        let span = model_call_span!("chat-model.call", Uuid::new_v4(), user_message(message));

        let response = async {
            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }
            let tools = self
                .registry
                .tool_names()
                .into_iter()
                .filter_map(|name| {
                    let tool = self.registry.lookup(&name)?;
                    Some(ToolChoice {
                        description: tool.description().to_string(),
                        name,
                    })
                })
                .collect();
            ModelResponse {
                role: "assistant".to_string(),
                content: "I need to call some tools to complete your request".to_string(),
                tools,
            }
        }
        .instrument(span.clone())
        .await;

        let output = serde_json::to_string(&[&response]).unwrap_or_default();
        record_model_response(
            &span,
            &output,
            message.chars().count(),
            output.chars().count(),
        );
        response
    }

    /// Parameters for `tool`, extracted from `message`.
    pub fn parameters_for(&self, tool: &str, message: &str) -> Parameters {
        match tool {
            WEATHER_TOOL => self.planner.weather_parameters(message),
            CALCULATOR_TOOL => self.planner.calculation_parameters(message),
            _ => Parameters::new(),
        }
    }

    /// Run the chain; results are keyed by tool name.
    pub async fn run(&self, message: &str) -> BTreeMap<String, Value> {
        match &self.dispatch {
            Some(dispatch) => self.run_traced(message).with_subscriber(dispatch.clone()).await,
            None => self.run_traced(message).await,
        }
    }

    async fn run_traced(&self, message: &str) -> BTreeMap<String, Value> {
        let root = tracing::info_span!("tool_chain.run", user.message = message);

        async {
            let response = self.model_call_traced(message).await;
            let mut results = BTreeMap::new();

            for choice in response.tools {
                let params = self.parameters_for(&choice.name, message);
                match self.registry.invoke(&choice.name, params).await {
                    Ok(value) => {
                        tracing::info!(tool = %choice.name, "Tool call succeeded");
                        results.insert(choice.name, value);
                    }
                    Err(e) => {
                        tracing::warn!(tool = %choice.name, error = %e, "Tool call failed, skipping");
                    }
                }
            }
            results
        }
        .instrument(root)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use taskweave_core::FailureReason;
    use taskweave_testing::{MockTool, SpanRecorder};
    use taskweave_tools::{CalculatorTool, WeatherTool};

    fn service(registry: ToolRegistry) -> ToolChainService {
        ToolChainService::new(Arc::new(registry)).with_latency(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_chain_runs_every_chosen_tool() {
        let recorder = SpanRecorder::new();
        let chain = service(
            ToolRegistry::new()
                .with_tool(WeatherTool::new().with_latency(Duration::ZERO))
                .with_tool(CalculatorTool::new().with_latency(Duration::ZERO)),
        );

        let results = chain
            .run("查询北京的天气，然后计算10+25的结果")
            .with_subscriber(recorder.dispatch())
            .await;

        assert_eq!(results["get_weather"]["city"], "Beijing");
        assert_eq!(results["calculator"]["result"].as_f64(), Some(35.0));

        let root = recorder.find("tool_chain.run").unwrap();
        let children: Vec<_> = recorder
            .children_of(&root)
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(children, vec!["chat-model.call", "tool.execute", "tool.execute"]);

        let model = recorder.find("chat-model.call").unwrap();
        let output: Value =
            serde_json::from_str(model.field("gen_ai.output.messages").unwrap()).unwrap();
        assert_eq!(output[0]["tools"].as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn test_failing_tool_is_skipped() {
        let chain = service(
            ToolRegistry::new()
                .with_tool(MockTool::new("broken").with_default_failure(FailureReason::Internal {
                    message: "boom".to_string(),
                }))
                .with_tool(MockTool::new("fine").with_default_response(json!("ok"))),
        );

        let results = chain.run("anything").await;
        assert_eq!(results.len(), 1);
        assert_eq!(results["fine"], "ok");
    }

    #[tokio::test]
    async fn test_injected_dispatch_receives_whole_chain() {
        let recorder = SpanRecorder::new();
        let chain = service(
            ToolRegistry::new().with_tool(CalculatorTool::new().with_latency(Duration::ZERO)),
        )
        .dispatch(recorder.dispatch());

        let results = chain.run("calculate 2 * 3").await;
        assert_eq!(results["calculator"]["result"].as_f64(), Some(6.0));

        let root = recorder.find("tool_chain.run").unwrap();
        let children: Vec<_> = recorder
            .children_of(&root)
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(children, vec!["chat-model.call", "tool.execute"]);
    }
}
