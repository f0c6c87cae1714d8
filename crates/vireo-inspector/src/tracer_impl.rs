//! EventSinkTracer - Bridge between the vireo Tracer and EventSink.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use vireo::{BindingKind, CompileOutcome, SpanId, SubscriberId, Tracer};

use crate::events::FlowEvent;
use crate::sink::EventSink;
use crate::span::new_span_id;

/// A `Tracer` implementation that forwards events to an `EventSink`.
///
/// Compile passes are timed: `CompileEnd` carries the time since the matching
/// `CompileStart`.
pub struct EventSinkTracer {
    sink: Arc<dyn EventSink>,
    start_times: Mutex<HashMap<SpanId, Instant>>,
}

impl EventSinkTracer {
    /// Create a new EventSinkTracer wrapping the given sink.
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self {
            sink,
            start_times: Mutex::new(HashMap::new()),
        }
    }
}

impl Tracer for EventSinkTracer {
    #[inline]
    fn new_span_id(&self) -> SpanId {
        new_span_id()
    }

    fn on_compile_start(&self, span_id: SpanId, root: &str) {
        self.start_times.lock().insert(span_id, Instant::now());
        self.sink.emit(FlowEvent::CompileStart {
            span_id,
            root: root.to_string(),
        });
    }

    fn on_compile_end(&self, span_id: SpanId, outcome: CompileOutcome) {
        let duration = self
            .start_times
            .lock()
            .remove(&span_id)
            .map(|start| start.elapsed())
            .unwrap_or(Duration::ZERO);
        self.sink.emit(FlowEvent::CompileEnd {
            span_id,
            result: outcome.into(),
            duration,
        });
        self.sink.flush();
    }

    #[inline]
    fn on_directive_bound(&self, span_id: SpanId, kind: &BindingKind, expression: &str) {
        self.sink.emit(FlowEvent::DirectiveBound {
            span_id,
            kind: kind.clone(),
            expression: expression.to_string(),
        });
    }

    #[inline]
    fn on_directive_skipped(&self, span_id: SpanId, attribute: &str) {
        self.sink.emit(FlowEvent::DirectiveSkipped {
            span_id,
            attribute: attribute.to_string(),
        });
    }

    #[inline]
    fn on_subscriber_created(&self, id: SubscriberId, expression: &str) {
        self.sink.emit(FlowEvent::SubscriberCreated {
            subscriber: id.0,
            expression: expression.to_string(),
        });
    }

    #[inline]
    fn on_subscriber_evaluated(&self, id: SubscriberId, expression: &str) {
        self.sink.emit(FlowEvent::SubscriberEvaluated {
            subscriber: id.0,
            expression: expression.to_string(),
        });
    }

    #[inline]
    fn on_view_updated(&self, id: SubscriberId, expression: &str, display: &str) {
        self.sink.emit(FlowEvent::ViewUpdated {
            subscriber: id.0,
            expression: expression.to_string(),
            display: display.to_string(),
        });
    }

    #[inline]
    fn on_event_dispatched(&self, event: &str, method: &str) {
        self.sink.emit(FlowEvent::EventDispatched {
            event: event.to_string(),
            method: method.to_string(),
        });
    }

    #[inline]
    fn on_subscriber_released(&self, id: SubscriberId) {
        self.sink
            .emit(FlowEvent::SubscriberReleased { subscriber: id.0 });
    }
}
