//! Event collector for testing.
//!
//! `EventCollector` accumulates events for later inspection and assertion.

use parking_lot::Mutex;

use crate::events::{ExecutionTrace, FlowEvent};
use crate::sink::EventSink;

/// Event collector for testing - accumulates events for assertions.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use vireo::{dom, DataObject, ViewModel};
/// use vireo_inspector::{EventCollector, EventSinkTracer};
///
/// let collector = Arc::new(EventCollector::new());
/// let root = dom::Node::element("div");
/// root.append_child(&dom::parse("<p>{{ a }}</p>").unwrap());
///
/// let vm = ViewModel::builder()
///     .data(DataObject::new().with("a", 1))
///     .mount(root)
///     .tracer(EventSinkTracer::new(collector.clone()))
///     .build()
///     .unwrap();
/// vm.set("a", 2).unwrap();
///
/// let trace = collector.trace();
/// assert_eq!(trace.view_updates().count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct EventCollector {
    events: Mutex<Vec<FlowEvent>>,
}

impl EventCollector {
    /// Create a new empty event collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get collected events as an execution trace.
    pub fn trace(&self) -> ExecutionTrace {
        ExecutionTrace {
            events: self.events.lock().clone(),
        }
    }

    /// Get collected events as a vector.
    pub fn events(&self) -> Vec<FlowEvent> {
        self.events.lock().clone()
    }

    /// Clear all collected events.
    pub fn clear(&self) {
        self.events.lock().clear();
    }

    /// Take collected events, clearing the collector.
    pub fn take(&self) -> Vec<FlowEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    /// Get the number of collected events.
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Check if no events have been collected.
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl EventSink for EventCollector {
    fn emit(&self, event: FlowEvent) {
        self.events.lock().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn released(subscriber: usize) -> FlowEvent {
        FlowEvent::SubscriberReleased { subscriber }
    }

    #[test]
    fn test_collector_basic() {
        let collector = EventCollector::new();
        assert!(collector.is_empty());

        collector.emit(released(0));
        collector.emit(released(1));

        assert_eq!(collector.len(), 2);
        assert_eq!(collector.trace().events[1], released(1));
    }

    #[test]
    fn test_collector_clear_and_take() {
        let collector = EventCollector::new();
        collector.emit(released(0));
        collector.clear();
        assert!(collector.is_empty());

        collector.emit(released(0));
        let events = collector.take();
        assert_eq!(events.len(), 1);
        assert!(collector.is_empty());
    }
}
