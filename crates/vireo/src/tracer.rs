//! Tracer trait for observing compilation and updates.
//!
//! Every hook has an empty default, so an implementation only overrides what it needs.
//! The default [`NoopTracer`] ignores everything. `vireo-inspector` provides a tracer
//! that turns hooks into serializable events.
//!
//! # Example
//!
//! ```
//! use std::cell::Cell;
//! use vireo::{SpanId, SubscriberId, Tracer};
//!
//! #[derive(Default)]
//! struct CountUpdates(Cell<usize>);
//!
//! impl Tracer for CountUpdates {
//!     fn new_span_id(&self) -> SpanId {
//!         SpanId(1)
//!     }
//!
//!     fn on_view_updated(&self, _id: SubscriberId, _expression: &str, _display: &str) {
//!         self.0.set(self.0.get() + 1);
//!     }
//! }
//! ```

use serde::{Deserialize, Serialize};
use vireo_reactive::SubscriberId;

/// Identifier of one compile pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpanId(pub u64);

/// What a binding site binds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BindingKind {
    /// Two-way value binding (`v-model`).
    Model,
    /// Text binding by attribute (`v-text`).
    Text,
    /// One `{{ }}` marker in text content.
    Interpolation,
    /// Event binding (`v-on:event` / `@event`).
    Event {
        /// Event type.
        event: String,
    },
}

/// How a compile pass ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileOutcome {
    /// Every binding site was bound.
    Completed {
        /// Subscribers created by the pass.
        subscribers: usize,
    },
    /// The pass was aborted.
    Failed {
        /// Display form of the error.
        message: String,
    },
}

/// Observer of the engine's activity.
///
/// The engine is single-threaded, so tracers need not be `Send` or `Sync`.
pub trait Tracer: 'static {
    /// Generate a new span id. Called once at the start of every compile pass.
    fn new_span_id(&self) -> SpanId;

    /// A compile pass started on the node described by `root`.
    #[inline]
    fn on_compile_start(&self, _span_id: SpanId, _root: &str) {}

    /// A compile pass ended.
    #[inline]
    fn on_compile_end(&self, _span_id: SpanId, _outcome: CompileOutcome) {}

    /// A binding site was bound. `expression` is the attribute value or marker text.
    #[inline]
    fn on_directive_bound(&self, _span_id: SpanId, _kind: &BindingKind, _expression: &str) {}

    /// An unknown directive attribute was left in place.
    #[inline]
    fn on_directive_skipped(&self, _span_id: SpanId, _attribute: &str) {}

    /// A subscriber was created and has performed its seeding read.
    #[inline]
    fn on_subscriber_created(&self, _id: SubscriberId, _expression: &str) {}

    /// A subscriber re-read its expression after a notification.
    #[inline]
    fn on_subscriber_evaluated(&self, _id: SubscriberId, _expression: &str) {}

    /// A subscriber saw a new value and pushed it into the view.
    #[inline]
    fn on_view_updated(&self, _id: SubscriberId, _expression: &str, _display: &str) {}

    /// A bound method is about to run for an event.
    #[inline]
    fn on_event_dispatched(&self, _event: &str, _method: &str) {}

    /// A subscriber was released from its dependency sets.
    #[inline]
    fn on_subscriber_released(&self, _id: SubscriberId) {}
}

/// Tracer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn new_span_id(&self) -> SpanId {
        SpanId(0)
    }
}
