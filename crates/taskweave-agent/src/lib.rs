//! # Taskweave Agent
//!
//! Turns objectives into task plans and executes them with nested tracing.
//!
//! ## Features
//!
//! - **Planner**: [`Planner`] trait with the deterministic [`KeywordPlanner`]
//! - **Orchestrator**: sequential, fail-fast execution with one span per run
//!   and one per task
//! - **Chat service**: keyword replies traced as GenAI `chat` spans
//! - **Tool chain**: simulated model tool selection followed by traced tool
//!   calls
//!
//! ## Example
//!
//! ```rust,no_run
//! use taskweave_agent::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let orchestrator = Orchestrator::builder().build();
//!     let mut run = orchestrator.plan("What's the weather in Tokyo?").await?;
//!     let report = orchestrator.execute(&mut run).await?;
//!     println!("{}", serde_json::to_string_pretty(&report)?);
//!     Ok(())
//! }
//! ```

pub mod chat;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod planner;
pub mod run;
pub mod toolchain;

pub use chat::{ChatRequest, ChatResponse, ChatService};
pub use config::AgentConfig;
pub use error::{AgentError, AgentResult, RunError};
pub use orchestrator::{Orchestrator, OrchestratorBuilder};
pub use planner::{KeywordPlanner, Planner};
pub use run::{Run, RunReport};
pub use toolchain::{ModelResponse, ToolChainService, ToolChoice};
