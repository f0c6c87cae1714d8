//! Forwarding events to the `tracing` crate.

use crate::events::FlowEvent;
use crate::sink::EventSink;

/// A sink that logs every event through `tracing` under the `vireo` target.
///
/// View updates and evaluations are logged at `trace` level, everything else at `debug`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: FlowEvent) {
        match &event {
            FlowEvent::CompileStart { span_id, root } => {
                tracing::debug!(target: "vireo", span_id = span_id.0, %root, "compile start");
            }
            FlowEvent::CompileEnd {
                span_id,
                result,
                duration,
            } => {
                tracing::debug!(target: "vireo", span_id = span_id.0, ?result, ?duration, "compile end");
            }
            FlowEvent::DirectiveBound {
                span_id,
                kind,
                expression,
            } => {
                tracing::debug!(target: "vireo", span_id = span_id.0, ?kind, %expression, "directive bound");
            }
            FlowEvent::DirectiveSkipped { span_id, attribute } => {
                tracing::debug!(target: "vireo", span_id = span_id.0, %attribute, "unknown directive skipped");
            }
            FlowEvent::SubscriberEvaluated { .. } | FlowEvent::ViewUpdated { .. } => {
                tracing::trace!(target: "vireo", ?event);
            }
            _ => tracing::debug!(target: "vireo", ?event),
        }
    }
}
