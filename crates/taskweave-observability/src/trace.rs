//! Telemetry pipeline assembly.
//!
//! [`Telemetry::init`] turns a [`TelemetryConfig`] into a
//! [`tracing::Dispatch`]. The dispatch is handed to whoever emits spans
//! (the orchestrator takes it as a constructor dependency); installing it
//! as the process-wide default is a separate, optional step for binaries.
//! The caller owns the lifecycle: [`Telemetry::shutdown`] flushes any
//! batched spans.

use crate::config::{ExporterKind, TelemetryConfig};
use crate::ObservabilityError;
use tracing::Dispatch;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry};

/// Exporter actually in use after `auto` resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveExporter {
    Console,
    Http,
}

/// An assembled telemetry pipeline.
pub struct Telemetry {
    dispatch: Dispatch,
    active: ActiveExporter,
    endpoint: String,
    #[cfg(feature = "opentelemetry")]
    provider: Option<opentelemetry_sdk::trace::SdkTracerProvider>,
}

impl std::fmt::Debug for Telemetry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Telemetry")
            .field("active", &self.active)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl Telemetry {
    /// Build the pipeline described by `config`.
    pub fn init(config: &TelemetryConfig) -> Result<Self, ObservabilityError> {
        match config.exporter {
            ExporterKind::Console => Self::console(config),
            ExporterKind::Http => Self::http(config),
            ExporterKind::Auto => Self::http(config).or_else(|e| {
                tracing::warn!(
                    error = %e,
                    "Failed to create HTTP exporter, falling back to console"
                );
                Self::console(config)
            }),
        }
    }

    fn env_filter(config: &TelemetryConfig) -> Result<EnvFilter, ObservabilityError> {
        EnvFilter::try_new(&config.log_filter).map_err(|e| {
            ObservabilityError::TracingInit(format!(
                "invalid filter '{}': {}",
                config.log_filter, e
            ))
        })
    }

    fn console(config: &TelemetryConfig) -> Result<Self, ObservabilityError> {
        let subscriber = Registry::default().with(Self::env_filter(config)?).with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_span_events(FmtSpan::CLOSE)
                .with_current_span(true)
                .with_span_list(true)
                .with_writer(std::io::stdout),
        );

        Ok(Self {
            dispatch: Dispatch::new(subscriber),
            active: ActiveExporter::Console,
            endpoint: config.endpoint.clone(),
            #[cfg(feature = "opentelemetry")]
            provider: None,
        })
    }

    #[cfg(feature = "opentelemetry")]
    fn http(config: &TelemetryConfig) -> Result<Self, ObservabilityError> {
        use crate::otel::{OtelConfig, build_tracer_provider};
        use opentelemetry::trace::TracerProvider as _;

        let otel_config = OtelConfig::new(config.endpoint.clone(), config.service_name.clone());
        let provider = build_tracer_provider(&otel_config)?;
        let tracer = provider.tracer("taskweave");

        // Logs still go to stderr so console output stays readable.
        let subscriber = Registry::default()
            .with(Self::env_filter(config)?)
            .with(tracing_opentelemetry::layer().with_tracer(tracer))
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr),
            );

        Ok(Self {
            dispatch: Dispatch::new(subscriber),
            active: ActiveExporter::Http,
            endpoint: config.endpoint.clone(),
            provider: Some(provider),
        })
    }

    #[cfg(not(feature = "opentelemetry"))]
    fn http(_config: &TelemetryConfig) -> Result<Self, ObservabilityError> {
        Err(ObservabilityError::OpenTelemetryInit(
            "OpenTelemetry feature not enabled".to_string(),
        ))
    }

    /// Dispatch to inject into span emitters.
    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    pub fn active_exporter(&self) -> ActiveExporter {
        self.active
    }

    /// Endpoint spans are exported to (meaningful for HTTP export).
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Install the dispatch as the process-wide default.
    ///
    /// Only one global default may ever be installed per process.
    pub fn install_global(&self) -> Result<(), ObservabilityError> {
        tracing::dispatcher::set_global_default(self.dispatch.clone())
            .map_err(|_| ObservabilityError::TracingInit("Already initialized".to_string()))?;

        tracing::info!(
            exporter = ?self.active,
            endpoint = %self.endpoint,
            "Initialized structured tracing"
        );
        Ok(())
    }

    /// Flush batched spans and stop exporting.
    pub fn shutdown(mut self) -> Result<(), ObservabilityError> {
        self.shutdown_provider()
    }

    fn shutdown_provider(&mut self) -> Result<(), ObservabilityError> {
        #[cfg(feature = "opentelemetry")]
        if let Some(provider) = self.provider.take() {
            provider
                .shutdown()
                .map_err(|e| ObservabilityError::Shutdown(e.to_string()))?;
        }
        Ok(())
    }
}

impl Drop for Telemetry {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown_provider() {
            eprintln!("Error shutting down tracer provider: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_pipeline() {
        let telemetry = Telemetry::init(&TelemetryConfig::console()).unwrap();
        assert_eq!(telemetry.active_exporter(), ActiveExporter::Console);

        tracing::dispatcher::with_default(telemetry.dispatch(), || {
            let span = tracing::info_span!("console.test");
            let _enter = span.enter();
            tracing::info!("inside console span");
        });

        telemetry.shutdown().unwrap();
    }

    #[test]
    fn test_invalid_filter_is_reported() {
        let config = TelemetryConfig::console().with_log_filter("taskweave=loud");
        let err = Telemetry::init(&config).unwrap_err();
        assert!(matches!(err, ObservabilityError::TracingInit(_)));
    }

    #[cfg(feature = "opentelemetry")]
    #[test]
    fn test_http_pipeline_builds_without_collector() {
        // The exporter connects lazily, so building never touches the network.
        let config = TelemetryConfig::http("http://127.0.0.1:4318").unwrap();
        let telemetry = Telemetry::init(&config).unwrap();
        assert_eq!(telemetry.active_exporter(), ActiveExporter::Http);
        assert_eq!(telemetry.endpoint(), "http://127.0.0.1:4318");
    }
}
