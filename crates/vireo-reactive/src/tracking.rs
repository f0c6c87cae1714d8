//! Explicit read-tracking context.
//!
//! A [`ReadContext`] is threaded through every read of a [`Cell`](crate::Cell). It either
//! carries the subscriber that must be registered by the read, or nothing. Tracking
//! contexts are only produced by a [`TrackingScope`], which marks the subscriber as the
//! runtime's active reader for exactly as long as the scope is alive.

use std::fmt;
use std::rc::Rc;

use crate::runtime::{Entry, Runtime, SubscriberId};

/// The subscriber (if any) that a read should register as a dependent.
#[derive(Clone, Default)]
pub struct ReadContext {
    tracked: Option<Rc<Entry>>,
}

impl ReadContext {
    /// A context that registers nothing.
    pub const fn untracked() -> Self {
        Self { tracked: None }
    }

    /// Returns true if reads through this context register a subscriber.
    pub fn is_tracking(&self) -> bool {
        self.tracked.is_some()
    }

    /// The subscriber this context registers, if any.
    pub fn subscriber(&self) -> Option<SubscriberId> {
        self.tracked.as_ref().map(|entry| entry.id)
    }

    pub(crate) fn entry(&self) -> Option<&Rc<Entry>> {
        self.tracked.as_ref()
    }
}

impl fmt::Debug for ReadContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.subscriber() {
            Some(id) => f.debug_tuple("Tracking").field(&id).finish(),
            None => f.write_str("Untracked"),
        }
    }
}

/// Scoped tracking guard.
///
/// While alive, the runtime reports the guarded subscriber as its active reader and
/// [`TrackingScope::context`] hands out a tracking [`ReadContext`]. Dropping the scope
/// restores the previous marker, including on unwind.
pub struct TrackingScope<'rt> {
    runtime: &'rt Runtime,
    previous: Option<SubscriberId>,
    context: ReadContext,
}

impl<'rt> TrackingScope<'rt> {
    pub(crate) fn enter(runtime: &'rt Runtime, entry: Rc<Entry>) -> Self {
        let previous = runtime.set_active(Some(entry.id));
        Self {
            runtime,
            previous,
            context: ReadContext {
                tracked: Some(entry),
            },
        }
    }

    /// The tracking context for reads performed inside this scope.
    pub fn context(&self) -> &ReadContext {
        &self.context
    }
}

impl Drop for TrackingScope<'_> {
    fn drop(&mut self) {
        self.runtime.set_active(self.previous);
    }
}
