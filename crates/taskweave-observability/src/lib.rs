//! Taskweave Observability
//!
//! Assembles the telemetry pipeline (console JSON output or OTLP/HTTP
//! export), hands callers an explicit [`tracing::Dispatch`] to inject into
//! orchestrators, and defines the GenAI span conventions shared by the
//! agent and tool crates.

pub mod config;
pub mod genai;
pub mod span;
pub mod trace;

#[cfg(feature = "opentelemetry")]
pub mod otel;

pub use config::{ConfigError, ExporterKind, TelemetryConfig};
pub use genai::{GenAiOperation, PROVIDER_OPENAI};
pub use span::{record_error, record_json};
pub use trace::{ActiveExporter, Telemetry};

/// Observability framework errors
#[derive(thiserror::Error, Debug)]
pub enum ObservabilityError {
    #[error("Tracing initialization failed: {0}")]
    TracingInit(String),

    #[error("OpenTelemetry setup failed: {0}")]
    OpenTelemetryInit(String),

    #[error("Telemetry shutdown failed: {0}")]
    Shutdown(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
