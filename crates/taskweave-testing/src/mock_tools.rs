//! # Mock Tools for Testing
//!
//! This module provides mock tool implementations that return predictable responses,
//! allowing for reliable and controlled orchestration scenarios.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use taskweave_core::{FailureReason, Parameters, Tool, ToolOutcome};

/// A mock tool that returns predefined responses based on its parameters.
///
/// Clones share call tracking, so a test can keep one handle and register
/// another.
#[derive(Debug, Clone)]
pub struct MockTool {
    name: String,
    description: String,
    responses: Vec<(Parameters, ToolOutcome)>,
    default_response: Option<ToolOutcome>,
    delay: Option<Duration>,
    timeout: Option<Duration>,
    call_history: Arc<Mutex<Vec<Parameters>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockTool {
    /// Create a new mock tool with the given name
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            description: format!("Mock tool {}", name),
            name,
            responses: Vec::new(),
            default_response: None,
            delay: None,
            timeout: None,
            call_history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a response for an exact parameter bag
    pub fn with_response(mut self, params: Parameters, response: Value) -> Self {
        self.responses.push((params, Ok(response)));
        self
    }

    /// Add a failure for an exact parameter bag
    pub fn with_failure(mut self, params: Parameters, reason: FailureReason) -> Self {
        self.responses.push((params, Err(reason)));
        self
    }

    /// Set a default response for any unmatched parameters
    pub fn with_default_response(mut self, response: Value) -> Self {
        self.default_response = Some(Ok(response));
        self
    }

    /// Set a default failure for any unmatched parameters
    pub fn with_default_failure(mut self, reason: FailureReason) -> Self {
        self.default_response = Some(Err(reason));
        self
    }

    /// Sleep this long before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Declare a per-tool timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Get the number of times this tool has been called
    pub fn call_count(&self) -> usize {
        lock(&self.call_history).len()
    }

    /// Get the history of parameters passed to this tool
    pub fn call_history(&self) -> Vec<Parameters> {
        lock(&self.call_history).clone()
    }

    /// Reset call history
    pub fn reset(&self) {
        lock(&self.call_history).clear();
    }

    /// Check if the tool was called with specific parameters
    pub fn was_called_with(&self, params: &Parameters) -> bool {
        lock(&self.call_history).contains(params)
    }
}

#[async_trait]
impl Tool for MockTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    async fn execute(&self, params: Parameters) -> ToolOutcome {
        lock(&self.call_history).push(params.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some((_, response)) = self.responses.iter().find(|(p, _)| *p == params) {
            response.clone()
        } else if let Some(default) = &self.default_response {
            default.clone()
        } else {
            Ok(json!({ "mock": self.name, "params": params }))
        }
    }

    fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}
