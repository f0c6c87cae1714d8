//! Inspector: tracing and observability for vireo.
//!
//! - **EventCollector**: collects events for testing and assertion
//! - **EventSinkTracer**: a [`vireo::Tracer`] that turns hooks into [`FlowEvent`]s
//! - **TracingSink**: bridges to the `tracing` crate (with the `tracing` feature)
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use vireo::{dom, DataObject, ViewModel};
//! use vireo_inspector::{to_kinds, EventCollector, EventKind, EventSinkTracer};
//!
//! let collector = Arc::new(EventCollector::new());
//! let root = dom::Node::element("div");
//! root.append_child(&dom::parse("<input v-model=\"name\">").unwrap());
//!
//! let vm = ViewModel::builder()
//!     .data(DataObject::new().with("name", "a"))
//!     .mount(root)
//!     .tracer(EventSinkTracer::new(collector.clone()))
//!     .build()
//!     .unwrap();
//! collector.clear();
//!
//! vm.set("name", "b").unwrap();
//! assert_eq!(
//!     to_kinds(&collector.trace()),
//!     vec![
//!         EventKind::SubscriberEvaluated { expression: "name".into() },
//!         EventKind::ViewUpdated { expression: "name".into(), display: "b".into() },
//!     ]
//! );
//! ```
//!
//! # Event Types
//!
//! - **Compilation**: `CompileStart`, `DirectiveBound`, `DirectiveSkipped`, `CompileEnd`
//! - **Subscribers**: `SubscriberCreated`, `SubscriberEvaluated`, `ViewUpdated`,
//!   `SubscriberReleased`
//! - **Events**: `EventDispatched`
//!
//! See [`FlowEvent`] for the complete list.

mod collector;
mod events;
mod sink;
mod span;
mod tracer_impl;
#[cfg(feature = "tracing")]
mod tracing_sink;

pub use collector::EventCollector;
pub use events::{
    to_kinds, BindingKind, CompileResult, EventKind, ExecutionTrace, FlowEvent, SpanId,
};
pub use sink::{EventSink, FilterSink, MultiplexSink, NullSink};
pub use span::new_span_id;
pub use tracer_impl::EventSinkTracer;
#[cfg(feature = "tracing")]
pub use tracing_sink::TracingSink;
