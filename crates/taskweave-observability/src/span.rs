//! Span helpers shared by span emitters.
//!
//! Spans passed here must declare the recorded fields up front
//! (`field = tracing::field::Empty`), otherwise `tracing` drops the value.

use serde::Serialize;
use tracing::Span;

/// Record `value` as a JSON string attribute on `span`.
pub fn record_json<T: Serialize + ?Sized>(span: &Span, field: &'static str, value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => {
            span.record(field, json.as_str());
        }
        Err(e) => {
            tracing::warn!(field, error = %e, "Failed to serialize span attribute");
        }
    }
}

/// Mark `span` as failed and attach `error` as an error event.
///
/// Expects the span to declare `otel.status_code` and `otel.status_message`.
pub fn record_error(span: &Span, error: &(dyn std::error::Error + 'static)) {
    span.record("otel.status_code", "ERROR");
    span.record("otel.status_message", tracing::field::display(error));
    span.in_scope(|| {
        tracing::error!(error, "{}", error);
    });
}
