//! # Environment-Based Telemetry Configuration
//!
//! ## Environment Variables
//! - `OTEL_TRACES_EXPORTER` - `console` (default), `http`/`otlp`, or `auto`
//!   (try OTLP/HTTP, fall back to console)
//! - `OTEL_EXPORTER_OTLP_ENDPOINT` - OTLP endpoint (default: `http://localhost:4318`).
//!   Setting it with a non-console exporter selects HTTP export.
//! - `OTEL_SERVICE_NAME` - Service name reported in the resource (default: `taskweave`)
//! - `RUST_LOG` - Log/span filter directives (default: `info`)

use std::env;
use std::fmt;
use url::Url;

/// Default OTLP/HTTP endpoint
pub const DEFAULT_OTLP_ENDPOINT: &str = "http://localhost:4318";

/// Default service name
pub const DEFAULT_SERVICE_NAME: &str = "taskweave";

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid environment variable '{key}': {message}")]
    InvalidEnvVar { key: String, message: String },

    #[error("Invalid endpoint '{endpoint}': {message}")]
    InvalidEndpoint { endpoint: String, message: String },
}

/// Where spans are exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExporterKind {
    /// JSON lines on stdout
    #[default]
    Console,
    /// OTLP over HTTP/protobuf
    Http,
    /// OTLP over HTTP, falling back to console if the exporter cannot be built
    Auto,
}

impl ExporterKind {
    /// Parse an `OTEL_TRACES_EXPORTER` value. Empty selects console.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "console" => Some(ExporterKind::Console),
            "http" | "otlp" => Some(ExporterKind::Http),
            "auto" => Some(ExporterKind::Auto),
            _ => None,
        }
    }
}

impl fmt::Display for ExporterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExporterKind::Console => "console",
            ExporterKind::Http => "http",
            ExporterKind::Auto => "auto",
        })
    }
}

/// Telemetry pipeline configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    pub exporter: ExporterKind,
    /// Normalized `scheme://host[:port]` endpoint, used by HTTP export
    pub endpoint: String,
    pub service_name: String,
    /// `EnvFilter` directives
    pub log_filter: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            exporter: ExporterKind::Console,
            endpoint: DEFAULT_OTLP_ENDPOINT.to_string(),
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            log_filter: "info".to_string(),
        }
    }
}

impl TelemetryConfig {
    /// Console export with default service name.
    pub fn console() -> Self {
        Self::default()
    }

    /// Forced OTLP/HTTP export to `endpoint`.
    pub fn http(endpoint: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            exporter: ExporterKind::Http,
            endpoint: normalize_endpoint(endpoint)?,
            ..Self::default()
        })
    }

    #[must_use]
    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = name.into();
        self
    }

    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for an unsupported exporter or a malformed endpoint.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        let raw_exporter = lookup("OTEL_TRACES_EXPORTER").unwrap_or_default();
        config.exporter =
            ExporterKind::parse(&raw_exporter).ok_or_else(|| ConfigError::InvalidEnvVar {
                key: "OTEL_TRACES_EXPORTER".to_string(),
                message: format!("unsupported exporter type '{}'", raw_exporter),
            })?;

        if let Some(endpoint) = non_empty(lookup("OTEL_EXPORTER_OTLP_ENDPOINT")) {
            config.endpoint = normalize_endpoint(&endpoint)?;
            if config.exporter != ExporterKind::Console {
                config.exporter = ExporterKind::Http;
            }
        }

        if let Some(name) = non_empty(lookup("OTEL_SERVICE_NAME")) {
            config.service_name = name;
        }

        if let Some(filter) = non_empty(lookup("RUST_LOG")) {
            config.log_filter = filter;
        }

        Ok(config)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Reduce an endpoint URL to `scheme://host[:port]`, dropping any path or query.
pub fn normalize_endpoint(raw: &str) -> Result<String, ConfigError> {
    let invalid = |message: String| ConfigError::InvalidEndpoint {
        endpoint: raw.to_string(),
        message,
    };

    let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    let host = url
        .host_str()
        .ok_or_else(|| invalid("missing host".to_string()))?;

    Ok(match url.port() {
        Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
        None => format!("{}://{}", url.scheme(), host),
    })
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
    fn test_defaults_without_env() {
        let config = TelemetryConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, TelemetryConfig::default());
        assert_eq!(config.exporter, ExporterKind::Console);
        assert_eq!(config.endpoint, DEFAULT_OTLP_ENDPOINT);
    }

    #[test]
    fn test_exporter_aliases() {
        assert_eq!(ExporterKind::parse("otlp"), Some(ExporterKind::Http));
        assert_eq!(ExporterKind::parse("HTTP"), Some(ExporterKind::Http));
        assert_eq!(ExporterKind::parse(""), Some(ExporterKind::Console));
        assert_eq!(ExporterKind::parse("auto"), Some(ExporterKind::Auto));
        assert_eq!(ExporterKind::parse("zipkin"), None);
    }

    #[test]
    fn test_unsupported_exporter_is_rejected() {
        let err = TelemetryConfig::from_lookup(lookup_from(&[("OTEL_TRACES_EXPORTER", "zipkin")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar { .. }));
    }

    #[test]
    fn test_endpoint_selects_http_unless_console() {
        let config = TelemetryConfig::from_lookup(lookup_from(&[
            ("OTEL_TRACES_EXPORTER", "auto"),
            ("OTEL_EXPORTER_OTLP_ENDPOINT", "http://collector:4318/v1/traces"),
        ]))
        .unwrap();
        assert_eq!(config.exporter, ExporterKind::Http);
        assert_eq!(config.endpoint, "http://collector:4318");

        let config = TelemetryConfig::from_lookup(lookup_from(&[
            ("OTEL_TRACES_EXPORTER", "console"),
            ("OTEL_EXPORTER_OTLP_ENDPOINT", "http://collector:4318"),
        ]))
        .unwrap();
        assert_eq!(config.exporter, ExporterKind::Console);
    }

    #[test]
    fn test_service_name_and_filter_overrides() {
        let config = TelemetryConfig::from_lookup(lookup_from(&[
            ("OTEL_SERVICE_NAME", "gen-ai-example"),
            ("RUST_LOG", "debug"),
        ]))
        .unwrap();
        assert_eq!(config.service_name, "gen-ai-example");
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn test_normalize_endpoint() {
        assert_eq!(
            normalize_endpoint("https://otel.example.com/path?q=1").unwrap(),
            "https://otel.example.com"
        );
        assert_eq!(
            normalize_endpoint("http://localhost:4318").unwrap(),
            "http://localhost:4318"
        );
        assert!(normalize_endpoint("not a url").is_err());
        assert!(normalize_endpoint("ftp://localhost:21").is_err());
    }
}
