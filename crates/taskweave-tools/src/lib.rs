//! # Taskweave Tools
//!
//! The tool registry the orchestrator dispatches through, and the standard
//! simulated tools.
//!
//! - [`ToolRegistry`]: concurrent name-to-tool map with traced invocation
//! - [`WeatherTool`] (`get_weather`) and [`CalculatorTool`] (`calculator`)

/// Tool registry and traced invocation.
pub mod registry;
/// Standard tool library.
pub mod standard;

pub use registry::ToolRegistry;
pub use standard::*;
pub use taskweave_core::{FailureReason, Parameters, Tool, ToolOutcome};
