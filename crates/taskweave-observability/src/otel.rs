//! OpenTelemetry Integration
//!
//! Builds the OTLP/HTTP tracer provider that backs the `http` exporter.

use crate::ObservabilityError;
use opentelemetry::KeyValue;
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::trace::SdkTracerProvider;

/// OpenTelemetry configuration
#[derive(Debug, Clone)]
pub struct OtelConfig {
    /// OTLP endpoint base URL (`scheme://host:port`)
    pub endpoint: String,
    /// Service name for telemetry
    pub service_name: String,
    /// Additional resource attributes
    pub resource_attributes: Vec<(String, String)>,
}

impl OtelConfig {
    /// Create new OpenTelemetry configuration
    pub fn new(endpoint: String, service_name: String) -> Self {
        Self {
            endpoint,
            service_name,
            resource_attributes: vec![(
                "service.version".to_string(),
                env!("CARGO_PKG_VERSION").to_string(),
            )],
        }
    }

    /// Add resource attribute
    pub fn with_attribute(mut self, key: String, value: String) -> Self {
        self.resource_attributes.push((key, value));
        self
    }

    /// Full URL of the OTLP/HTTP traces signal.
    pub fn traces_url(&self) -> String {
        format!("{}/v1/traces", self.endpoint.trim_end_matches('/'))
    }
}

/// Build a batching tracer provider exporting over OTLP/HTTP.
pub fn build_tracer_provider(config: &OtelConfig) -> Result<SdkTracerProvider, ObservabilityError> {
    use opentelemetry_otlp::{Protocol, WithExportConfig};

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_http()
        .with_protocol(Protocol::HttpBinary)
        .with_endpoint(config.traces_url())
        .build()
        .map_err(|e| {
            ObservabilityError::OpenTelemetryInit(format!("Failed to create exporter: {}", e))
        })?;

    let resource = Resource::builder()
        .with_service_name(config.service_name.clone())
        .with_attributes(
            config
                .resource_attributes
                .iter()
                .map(|(k, v)| KeyValue::new(k.clone(), v.clone())),
        )
        .build();

    let provider = SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(resource)
        .build();

    tracing::debug!(
        endpoint = %config.traces_url(),
        service = %config.service_name,
        "OTLP tracer provider built"
    );

    Ok(provider)
}
