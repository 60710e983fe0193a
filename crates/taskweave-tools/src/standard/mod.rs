//! # Standard Tool Library
//!
//! Simulated tools used by the default planner and the tool-chain service.
//!
//! ```rust
//! use taskweave_tools::{CalculatorTool, ToolRegistry, WeatherTool};
//!
//! let registry = ToolRegistry::new()
//!     .with_tool(WeatherTool::new())
//!     .with_tool(CalculatorTool::new());
//! assert_eq!(registry.len(), 2);
//! ```

/// Arithmetic tool
pub mod calculator;
/// Weather lookup tool
pub mod weather;

pub use calculator::{CalculatorTool, Operation};
pub use weather::WeatherTool;
