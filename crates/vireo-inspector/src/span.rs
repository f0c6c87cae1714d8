//! Span ID generation for compile passes.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::events::SpanId;

static SPAN_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Generate a new unique span ID.
pub fn new_span_id() -> SpanId {
    SpanId(SPAN_COUNTER.fetch_add(1, Ordering::Relaxed))
}
