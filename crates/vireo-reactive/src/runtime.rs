//! Subscriber ownership and the active-reader marker.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use slab::Slab;

use crate::dep::Dep;
use crate::tracking::{ReadContext, TrackingScope};
use crate::watcher::{Subscriber, Watcher};

/// Identifier of a subscriber owned by a [`Runtime`].
///
/// Ids are slab keys and may be reused after [`Runtime::release`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(pub usize);

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A subscriber slot: the subscriber itself plus every [`Dep`] it was registered in.
pub(crate) struct Entry {
    pub(crate) id: SubscriberId,
    pub(crate) subscriber: Rc<dyn Subscriber>,
    pub(crate) sources: RefCell<Vec<Dep>>,
}

#[derive(Default)]
struct RuntimeInner {
    subscribers: RefCell<Slab<Rc<Entry>>>,
    active: std::cell::Cell<Option<SubscriberId>>,
}

/// Runtime owns every subscriber created through it.
///
/// This is cheap to clone; clones share the same subscribers.
///
/// Dependency sets only hold weak references, so releasing a subscriber (or dropping
/// the last runtime handle) is enough to stop it from ever being notified again.
#[derive(Clone, Default)]
pub struct Runtime {
    inner: Rc<RuntimeInner>,
}

impl Runtime {
    /// Create a new runtime.
    pub fn new() -> Self {
        Default::default()
    }

    /// Create a subscriber and perform its seeding read.
    ///
    /// `read` is called once under a tracking context (every [`Cell`](crate::Cell) it
    /// reads registers the new subscriber) and afterwards only with untracked contexts.
    /// `callback` runs whenever a later read yields a value that `eq` considers different
    /// from the last one seen.
    pub fn watch<T, R, C>(&self, read: R, eq: fn(&T, &T) -> bool, callback: C) -> SubscriberId
    where
        T: Clone + 'static,
        R: Fn(&ReadContext) -> T + 'static,
        C: Fn(&T) + 'static,
    {
        let watcher = Rc::new(Watcher::new(read, eq, callback));
        let entry = {
            let mut subscribers = self.inner.subscribers.borrow_mut();
            let slot = subscribers.vacant_entry();
            let entry = Rc::new(Entry {
                id: SubscriberId(slot.key()),
                subscriber: watcher.clone(),
                sources: RefCell::new(Vec::new()),
            });
            slot.insert(entry.clone());
            entry
        };
        let id = entry.id;
        // Declared before the scope so the marker is restored first on unwind.
        let pending = PendingSeed {
            runtime: self,
            id: Some(id),
        };
        let scope = TrackingScope::enter(self, entry);
        watcher.seed(scope.context());
        pending.commit();
        id
    }

    /// Run one subscriber's update, as a dependency notification would.
    ///
    /// Returns false if the subscriber does not exist.
    pub fn update(&self, id: SubscriberId) -> bool {
        let Some(entry) = self.entry(id) else {
            return false;
        };
        entry.subscriber.update();
        true
    }

    /// Remove a subscriber from every dependency set it registered in and drop it.
    ///
    /// Returns false if the subscriber does not exist.
    pub fn release(&self, id: SubscriberId) -> bool {
        let removed = {
            let mut subscribers = self.inner.subscribers.borrow_mut();
            subscribers.try_remove(id.0)
        };
        let Some(entry) = removed else {
            return false;
        };
        for dep in entry.sources.borrow_mut().drain(..) {
            dep.remove(&entry);
        }
        true
    }

    /// Release every subscriber owned by this runtime.
    pub fn release_all(&self) {
        let ids: Vec<SubscriberId> = self
            .inner
            .subscribers
            .borrow()
            .iter()
            .map(|(key, _)| SubscriberId(key))
            .collect();
        for id in ids {
            self.release(id);
        }
    }

    /// Returns true if the subscriber exists.
    pub fn contains(&self, id: SubscriberId) -> bool {
        self.inner.subscribers.borrow().contains(id.0)
    }

    /// Number of live subscribers.
    pub fn len(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }

    /// Returns true if there are no live subscribers.
    pub fn is_empty(&self) -> bool {
        self.inner.subscribers.borrow().is_empty()
    }

    /// Number of dependency registrations a subscriber made during its seeding read.
    pub fn sources(&self, id: SubscriberId) -> usize {
        self.entry(id)
            .map(|entry| entry.sources.borrow().len())
            .unwrap_or(0)
    }

    /// The subscriber currently performing its seeding read, if any.
    pub fn active_subscriber(&self) -> Option<SubscriberId> {
        self.inner.active.get()
    }

    pub(crate) fn set_active(&self, id: Option<SubscriberId>) -> Option<SubscriberId> {
        self.inner.active.replace(id)
    }

    fn entry(&self, id: SubscriberId) -> Option<Rc<Entry>> {
        self.inner.subscribers.borrow().get(id.0).cloned()
    }
}

/// Releases a subscriber whose seeding read did not complete.
struct PendingSeed<'rt> {
    runtime: &'rt Runtime,
    id: Option<SubscriberId>,
}

impl PendingSeed<'_> {
    fn commit(mut self) {
        self.id = None;
    }
}

impl Drop for PendingSeed<'_> {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            self.runtime.release(id);
        }
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("subscribers", &self.len())
            .field("active", &self.active_subscriber())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Cell;
    use std::cell::RefCell;

    fn eq(a: &i32, b: &i32) -> bool {
        a == b
    }

    #[test]
    fn test_watch_registers_once() {
        let runtime = Runtime::new();
        let cell = Rc::new(Cell::new(1));
        let source = cell.clone();
        let id = runtime.watch(move |cx| source.read(cx), eq, |_| {});

        assert_eq!(runtime.len(), 1);
        assert_eq!(runtime.sources(id), 1);
        assert_eq!(cell.dep().len(), 1);

        // Later updates read untracked and must not grow the dependency set.
        cell.write(2, eq);
        cell.write(3, eq);
        assert_eq!(cell.dep().len(), 1);
    }

    #[test]
    fn test_update_unknown_subscriber() {
        let runtime = Runtime::new();
        assert!(!runtime.update(SubscriberId(42)));
        assert!(!runtime.release(SubscriberId(42)));
    }

    #[test]
    fn test_release_removes_from_deps() {
        let runtime = Runtime::new();
        let cell = Rc::new(Cell::new(1));
        let fired = Rc::new(RefCell::new(0));

        let source = cell.clone();
        let counter = fired.clone();
        let id = runtime.watch(
            move |cx| source.read(cx),
            eq,
            move |_| *counter.borrow_mut() += 1,
        );

        assert!(runtime.release(id));
        assert!(!runtime.contains(id));
        assert_eq!(cell.dep().len(), 0);

        cell.write(5, eq);
        assert_eq!(*fired.borrow(), 0);
    }

    #[test]
    fn test_panicking_seed_leaves_no_subscriber() {
        let runtime = Runtime::new();
        let cell = Rc::new(Cell::new(1));
        let source = cell.clone();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            runtime.watch(
                move |cx| -> i32 {
                    source.read(cx);
                    panic!("seeding read failed")
                },
                eq,
                |_| {},
            )
        }));

        assert!(result.is_err());
        assert!(runtime.is_empty());
        assert!(cell.dep().is_empty());
        assert_eq!(runtime.active_subscriber(), None);

        // The slot is free again.
        let source = cell.clone();
        let id = runtime.watch(move |cx| source.read(cx), eq, |_| {});
        assert_eq!(id, SubscriberId(0));
        assert_eq!(cell.dep().len(), 1);
    }

    #[test]
    fn test_release_all() {
        let runtime = Runtime::new();
        let a = Rc::new(Cell::new(1));
        let b = Rc::new(Cell::new(2));
        for cell in [&a, &b] {
            let source = cell.clone();
            runtime.watch(move |cx| source.read(cx), eq, |_| {});
        }
        assert_eq!(runtime.len(), 2);

        runtime.release_all();
        assert!(runtime.is_empty());
        assert!(a.dep().is_empty());
        assert!(b.dep().is_empty());
    }

    #[test]
    fn test_dropped_runtime_stops_notifications() {
        let cell = Rc::new(Cell::new(1));
        let fired = Rc::new(RefCell::new(0));
        {
            let runtime = Runtime::new();
            let source = cell.clone();
            let counter = fired.clone();
            runtime.watch(
                move |cx| source.read(cx),
                eq,
                move |_| *counter.borrow_mut() += 1,
            );
        }
        cell.write(2, eq);
        assert_eq!(*fired.borrow(), 0);
        assert_eq!(cell.dep().len(), 0);
    }
}
