//! # Weather Tool
//!
//! Simulated weather lookup. Reports fixed conditions for any city after a
//! short latency standing in for a remote API call.

use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use taskweave_core::{Parameters, Tool, ToolOutcome};

/// Default simulated API latency.
pub const WEATHER_LATENCY: Duration = Duration::from_millis(50);

/// Weather information for a specified city.
#[derive(Debug, Clone)]
pub struct WeatherTool {
    latency: Duration,
}

impl WeatherTool {
    pub fn new() -> Self {
        Self {
            latency: WEATHER_LATENCY,
        }
    }

    /// Override the simulated latency.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

impl Default for WeatherTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &str {
        "get_weather"
    }

    fn description(&self) -> &str {
        "Get weather information for a specified city"
    }

    async fn execute(&self, params: Parameters) -> ToolOutcome {
        let city = params.require_str("city")?;

        tokio::time::sleep(self.latency).await;

        Ok(json!({
            "city": city,
            "temperature": "22°C",
            "condition": "Sunny",
            "humidity": "65%",
        }))
    }
}
