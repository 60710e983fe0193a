//! # Agent Configuration
//!
//! ## Environment Variables
//! - `TASKWEAVE_AGENT_NAME` - Agent name on plan/run spans (default: `assistant`)
//! - `TASKWEAVE_TOOL_TIMEOUT` - Default per-tool timeout, e.g. `2s` (default: none)
//! - `TASKWEAVE_SUMMARY_DELAY` - Simulated summarizer latency (default: `100ms`)

use crate::error::AgentError;
use std::env;
use std::time::Duration;

/// Default agent name
pub const DEFAULT_AGENT_NAME: &str = "assistant";

/// Default simulated latency of the summarize step
pub const DEFAULT_SUMMARY_DELAY: Duration = Duration::from_millis(100);

/// Orchestrator settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentConfig {
    pub agent_name: String,
    /// Applied to tools that declare no timeout of their own
    pub tool_timeout: Option<Duration>,
    pub summary_delay: Duration,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            agent_name: DEFAULT_AGENT_NAME.to_string(),
            tool_timeout: None,
            summary_delay: DEFAULT_SUMMARY_DELAY,
        }
    }
}

impl AgentConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, AgentError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AgentError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(name) = get_string(&lookup, "TASKWEAVE_AGENT_NAME") {
            config.agent_name = name;
        }
        if let Some(timeout) = get_duration(&lookup, "TASKWEAVE_TOOL_TIMEOUT")? {
            config.tool_timeout = Some(timeout);
        }
        if let Some(delay) = get_duration(&lookup, "TASKWEAVE_SUMMARY_DELAY")? {
            config.summary_delay = delay;
        }

        Ok(config)
    }
}

fn get_string<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn get_duration<F>(lookup: &F, key: &str) -> Result<Option<Duration>, AgentError>
where
    F: Fn(&str) -> Option<String>,
{
    match get_string(lookup, key) {
        Some(val) => humantime::parse_duration(&val)
            .map(Some)
            .map_err(|e| AgentError::InvalidConfig {
                key: key.to_string(),
                message: e.to_string(),
            }),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AgentConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, AgentConfig::default());
        assert_eq!(config.summary_delay, Duration::from_millis(100));
    }

    #[test]
    fn test_overrides() {
        let config = AgentConfig::from_lookup(lookup_from(&[
            ("TASKWEAVE_AGENT_NAME", "planner-7"),
            ("TASKWEAVE_TOOL_TIMEOUT", "2s"),
            ("TASKWEAVE_SUMMARY_DELAY", "5ms"),
        ]))
        .unwrap();
        assert_eq!(config.agent_name, "planner-7");
        assert_eq!(config.tool_timeout, Some(Duration::from_secs(2)));
        assert_eq!(config.summary_delay, Duration::from_millis(5));
    }

    #[test]
    fn test_invalid_duration() {
        let err = AgentConfig::from_lookup(lookup_from(&[("TASKWEAVE_TOOL_TIMEOUT", "soon")]))
            .unwrap_err();
        assert!(matches!(err, AgentError::InvalidConfig { ref key, .. } if key == "TASKWEAVE_TOOL_TIMEOUT"));
    }
}
