//! # Taskweave
//!
//! Traced task orchestration for generative-AI agents. This crate re-exports
//! the workspace crates under one roof:
//!
//! - [`core`]: tasks, parameters, the [`Tool`] trait and error types
//! - [`tools`]: the concurrent [`ToolRegistry`] and the standard tools
//! - [`agent`]: planner, orchestrator, chat and tool-chain services
//! - [`observability`]: telemetry pipeline and GenAI span helpers
//!
//! ```rust,no_run
//! use taskweave::{Orchestrator, Telemetry, TelemetryConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let telemetry = Telemetry::init(&TelemetryConfig::from_env()?)?;
//!     let orchestrator = Orchestrator::builder()
//!         .dispatch(telemetry.dispatch().clone())
//!         .build();
//!
//!     let mut run = orchestrator.plan("weather in Tokyo, then calculate 3 * 4").await?;
//!     let report = orchestrator.execute(&mut run).await?;
//!     println!("{}", serde_json::to_string_pretty(&report)?);
//!
//!     telemetry.shutdown()?;
//!     Ok(())
//! }
//! ```

pub use taskweave_agent as agent;
pub use taskweave_core as core;
pub use taskweave_observability as observability;
pub use taskweave_tools as tools;

pub use taskweave_agent::{
    AgentConfig, AgentError, ChatRequest, ChatResponse, ChatService, KeywordPlanner,
    Orchestrator, OrchestratorBuilder, Planner, Run, RunError, RunReport, ToolChainService,
};
pub use taskweave_core::{
    ExecutionError, FailureReason, Parameters, Task, TaskId, TaskKind, TaskStatus, Tool,
};
pub use taskweave_observability::{Telemetry, TelemetryConfig};
pub use taskweave_tools::{CalculatorTool, ToolRegistry, WeatherTool};
