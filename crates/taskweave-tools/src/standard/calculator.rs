//! # Calculator Tool
//!
//! Basic arithmetic over two operands.

use async_trait::async_trait;
use serde_json::json;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use taskweave_core::{FailureReason, Parameters, Tool, ToolOutcome};

/// Default simulated latency.
pub const CALCULATOR_LATENCY: Duration = Duration::from_millis(10);

/// Supported arithmetic operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Subtract => "subtract",
            Operation::Multiply => "multiply",
            Operation::Divide => "divide",
        }
    }

    /// Map an infix operator (`+ - * / x × ÷`) to its operation.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '+' => Some(Operation::Add),
            '-' => Some(Operation::Subtract),
            '*' | 'x' | 'X' | '×' => Some(Operation::Multiply),
            '/' | '÷' => Some(Operation::Divide),
            _ => None,
        }
    }

    /// Apply the operation. Division by zero is a domain failure.
    pub fn apply(&self, a: f64, b: f64) -> Result<f64, FailureReason> {
        match self {
            Operation::Add => Ok(a + b),
            Operation::Subtract => Ok(a - b),
            Operation::Multiply => Ok(a * b),
            Operation::Divide if b == 0.0 => Err(FailureReason::Domain {
                message: "division by zero".to_string(),
            }),
            Operation::Divide => Ok(a / b),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = FailureReason;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(Operation::Add),
            "subtract" => Ok(Operation::Subtract),
            "multiply" => Ok(Operation::Multiply),
            "divide" => Ok(Operation::Divide),
            other => Err(FailureReason::InvalidInput {
                message: format!("unsupported operation: {}", other),
            }),
        }
    }
}

/// Arithmetic tool taking `operation`, `a` and `b`.
#[derive(Debug, Clone)]
pub struct CalculatorTool {
    latency: Duration,
}

impl CalculatorTool {
    pub fn new() -> Self {
        Self {
            latency: CALCULATOR_LATENCY,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

impl Default for CalculatorTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for CalculatorTool {
    fn name(&self) -> &str {
        "calculator"
    }

    fn description(&self) -> &str {
        "Perform basic mathematical calculations"
    }

    async fn execute(&self, params: Parameters) -> ToolOutcome {
        let operation: Operation = params.require_str("operation")?.parse()?;
        let a = params.require_f64("a")?;
        let b = params.require_f64("b")?;

        tokio::time::sleep(self.latency).await;

        let result = operation.apply(a, b)?;
        Ok(json!({
            "operation": operation.as_str(),
            "a": a,
            "b": b,
            "result": result,
        }))
    }
}
