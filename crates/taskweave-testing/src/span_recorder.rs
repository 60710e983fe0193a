//! In-memory span capture.
//!
//! [`SpanRecorder`] is a `tracing_subscriber` layer that keeps every span
//! it sees: name, fields (as strings), parent, error events and close
//! order. Hand [`SpanRecorder::dispatch`] to the code under test instead of
//! installing a global subscriber.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::{Dispatch, Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{Layer, Registry};

/// A captured span.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedSpan {
    /// Position in creation order; stable for the recorder's lifetime.
    pub index: usize,
    pub name: String,
    /// Index of the parent span, if any.
    pub parent: Option<usize>,
    pub fields: BTreeMap<String, String>,
    /// Messages of `ERROR` events emitted inside this span.
    pub errors: Vec<String>,
    pub closed: bool,
}

impl RecordedSpan {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// `otel.name` when the span overrides it, otherwise the static name.
    pub fn display_name(&self) -> &str {
        self.field("otel.name").unwrap_or(&self.name)
    }
}

#[derive(Debug, Default)]
struct Recorded {
    spans: Vec<RecordedSpan>,
    // live span id -> index; ids are reused by the registry after close
    live: HashMap<u64, usize>,
    close_order: Vec<usize>,
}

/// Layer recording spans into shared memory.
#[derive(Debug, Clone, Default)]
pub struct SpanRecorder {
    inner: Arc<Mutex<Recorded>>,
}

impl SpanRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A dispatch that routes everything into this recorder.
    pub fn dispatch(&self) -> Dispatch {
        Dispatch::new(Registry::default().with(self.clone()))
    }

    fn lock(&self) -> MutexGuard<'_, Recorded> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Every span seen, in creation order.
    pub fn spans(&self) -> Vec<RecordedSpan> {
        self.lock().spans.clone()
    }

    /// Spans whose static name is `name`.
    pub fn spans_named(&self, name: &str) -> Vec<RecordedSpan> {
        self.lock()
            .spans
            .iter()
            .filter(|s| s.name == name)
            .cloned()
            .collect()
    }

    /// First span whose static name or `otel.name` is `name`.
    pub fn find(&self, name: &str) -> Option<RecordedSpan> {
        self.lock()
            .spans
            .iter()
            .find(|s| s.name == name || s.display_name() == name)
            .cloned()
    }

    pub fn parent_of(&self, span: &RecordedSpan) -> Option<RecordedSpan> {
        let parent = span.parent?;
        self.lock().spans.get(parent).cloned()
    }

    pub fn children_of(&self, span: &RecordedSpan) -> Vec<RecordedSpan> {
        self.lock()
            .spans
            .iter()
            .filter(|s| s.parent == Some(span.index))
            .cloned()
            .collect()
    }

    /// Display names of closed spans, in the order they closed.
    pub fn close_order(&self) -> Vec<String> {
        let recorded = self.lock();
        recorded
            .close_order
            .iter()
            .filter_map(|&i| recorded.spans.get(i))
            .map(|s| s.display_name().to_string())
            .collect()
    }

    pub fn clear(&self) {
        let mut recorded = self.lock();
        recorded.spans.clear();
        recorded.live.clear();
        recorded.close_order.clear();
    }
}

struct FieldVisitor<'a>(&'a mut BTreeMap<String, String>);

impl Visit for FieldVisitor<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{:?}", value));
    }
}

impl<S> Layer<S> for SpanRecorder
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let mut fields = BTreeMap::new();
        attrs.record(&mut FieldVisitor(&mut fields));

        let parent_id = ctx
            .span(id)
            .and_then(|span| span.parent())
            .map(|parent| parent.id().into_u64());

        let mut recorded = self.lock();
        let parent = parent_id.and_then(|p| recorded.live.get(&p).copied());
        let index = recorded.spans.len();
        recorded.spans.push(RecordedSpan {
            index,
            name: attrs.metadata().name().to_string(),
            parent,
            fields,
            errors: Vec::new(),
            closed: false,
        });
        recorded.live.insert(id.into_u64(), index);
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, _ctx: Context<'_, S>) {
        let mut recorded = self.lock();
        let Some(index) = recorded.live.get(&id.into_u64()).copied() else {
            return;
        };
        values.record(&mut FieldVisitor(&mut recorded.spans[index].fields));
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        if *event.metadata().level() != Level::ERROR {
            return;
        }
        let Some(span) = ctx.event_span(event) else {
            return;
        };

        let mut fields = BTreeMap::new();
        event.record(&mut FieldVisitor(&mut fields));
        let message = fields.remove("message").unwrap_or_default();

        let mut recorded = self.lock();
        if let Some(index) = recorded.live.get(&span.id().into_u64()).copied() {
            recorded.spans[index].errors.push(message);
        }
    }

    fn on_close(&self, id: Id, _ctx: Context<'_, S>) {
        let mut recorded = self.lock();
        if let Some(index) = recorded.live.remove(&id.into_u64()) {
            recorded.spans[index].closed = true;
            recorded.close_order.push(index);
        }
    }
}
