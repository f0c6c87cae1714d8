//! Event types for vireo tracing.
//!
//! One event per [`Tracer`](vireo::Tracer) hook: compile passes, binding sites, and the
//! life of every subscriber.

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use vireo::{BindingKind, SpanId};

use vireo::CompileOutcome;

/// How a compile pass ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompileResult {
    /// Every binding site was bound.
    Completed { subscribers: usize },
    /// The pass was aborted with an error.
    Failed { message: String },
}

impl From<CompileOutcome> for CompileResult {
    fn from(outcome: CompileOutcome) -> Self {
        match outcome {
            CompileOutcome::Completed { subscribers } => CompileResult::Completed { subscribers },
            CompileOutcome::Failed { message } => CompileResult::Failed { message },
        }
    }
}

/// Events emitted while compiling and driving a view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FlowEvent {
    // === Compilation ===
    /// A compile pass started.
    CompileStart { span_id: SpanId, root: String },

    /// A compile pass ended.
    CompileEnd {
        span_id: SpanId,
        result: CompileResult,
        /// Wall time of the pass.
        duration: Duration,
    },

    /// A binding site was bound.
    DirectiveBound {
        span_id: SpanId,
        kind: BindingKind,
        /// Expression, or method name for event bindings.
        expression: String,
    },

    /// An unknown directive attribute was left in place.
    DirectiveSkipped { span_id: SpanId, attribute: String },

    // === Subscribers ===
    /// A subscriber was created; its seeding read is done.
    SubscriberCreated { subscriber: usize, expression: String },

    /// A subscriber re-read its expression after a notification.
    SubscriberEvaluated { subscriber: usize, expression: String },

    /// A subscriber pushed a new value into the view.
    ViewUpdated {
        subscriber: usize,
        expression: String,
        /// The text written into the view.
        display: String,
    },

    /// A subscriber was released.
    SubscriberReleased { subscriber: usize },

    // === Events ===
    /// A bound method ran for a view event.
    EventDispatched { event: String, method: String },
}

/// The events recorded for one or more compile passes and the updates that followed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionTrace {
    pub events: Vec<FlowEvent>,
}

/// Event kind for comparison (without span ids or durations).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    CompileStart { root: String },
    CompileEnd { result: CompileResult },
    DirectiveBound { kind: BindingKind, expression: String },
    DirectiveSkipped { attribute: String },
    SubscriberCreated { expression: String },
    SubscriberEvaluated { expression: String },
    ViewUpdated { expression: String, display: String },
    SubscriberReleased,
    EventDispatched { event: String, method: String },
}

impl From<&FlowEvent> for EventKind {
    fn from(event: &FlowEvent) -> Self {
        match event {
            FlowEvent::CompileStart { root, .. } => EventKind::CompileStart { root: root.clone() },
            FlowEvent::CompileEnd { result, .. } => EventKind::CompileEnd {
                result: result.clone(),
            },
            FlowEvent::DirectiveBound {
                kind, expression, ..
            } => EventKind::DirectiveBound {
                kind: kind.clone(),
                expression: expression.clone(),
            },
            FlowEvent::DirectiveSkipped { attribute, .. } => EventKind::DirectiveSkipped {
                attribute: attribute.clone(),
            },
            FlowEvent::SubscriberCreated { expression, .. } => EventKind::SubscriberCreated {
                expression: expression.clone(),
            },
            FlowEvent::SubscriberEvaluated { expression, .. } => EventKind::SubscriberEvaluated {
                expression: expression.clone(),
            },
            FlowEvent::ViewUpdated {
                expression,
                display,
                ..
            } => EventKind::ViewUpdated {
                expression: expression.clone(),
                display: display.clone(),
            },
            FlowEvent::SubscriberReleased { .. } => EventKind::SubscriberReleased,
            FlowEvent::EventDispatched { event, method } => EventKind::EventDispatched {
                event: event.clone(),
                method: method.clone(),
            },
        }
    }
}

/// Convert a trace to a list of event kinds for comparison.
pub fn to_kinds(trace: &ExecutionTrace) -> Vec<EventKind> {
    trace.events.iter().map(EventKind::from).collect()
}

impl ExecutionTrace {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: FlowEvent) {
        self.events.push(event);
    }

    /// Events about one subscriber.
    pub fn events_for_subscriber(&self, subscriber: usize) -> Vec<&FlowEvent> {
        self.events
            .iter()
            .filter(|e| subscriber_of(e) == Some(subscriber))
            .collect()
    }

    /// Every view update as (subscriber, expression, display).
    pub fn view_updates(&self) -> impl Iterator<Item = (usize, &str, &str)> {
        self.events.iter().filter_map(|e| match e {
            FlowEvent::ViewUpdated {
                subscriber,
                expression,
                display,
            } => Some((*subscriber, expression.as_str(), display.as_str())),
            _ => None,
        })
    }

    /// Every finished compile pass with its result and duration.
    pub fn compile_ends(&self) -> impl Iterator<Item = (&SpanId, &CompileResult, &Duration)> {
        self.events.iter().filter_map(|e| match e {
            FlowEvent::CompileEnd {
                span_id,
                result,
                duration,
            } => Some((span_id, result, duration)),
            _ => None,
        })
    }

    /// Check if any event matches a predicate.
    pub fn has_event<F>(&self, predicate: F) -> bool
    where
        F: Fn(&FlowEvent) -> bool,
    {
        self.events.iter().any(predicate)
    }
}

fn subscriber_of(event: &FlowEvent) -> Option<usize> {
    match event {
        FlowEvent::SubscriberCreated { subscriber, .. }
        | FlowEvent::SubscriberEvaluated { subscriber, .. }
        | FlowEvent::ViewUpdated { subscriber, .. }
        | FlowEvent::SubscriberReleased { subscriber } => Some(*subscriber),
        _ => None,
    }
}
