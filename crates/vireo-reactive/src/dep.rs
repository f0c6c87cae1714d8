use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::runtime::{Entry, SubscriberId};

/// Dependency set: the subscribers interested in one cell.
///
/// Subscribers are kept in registration order. Registering the same subscriber twice
/// keeps both entries, so it is notified twice.
///
/// Clone is cheap and shares the same set.
#[derive(Clone, Default)]
pub struct Dep {
    subscribers: Rc<RefCell<Vec<Weak<Entry>>>>,
}

impl Dep {
    /// Create an empty dependency set.
    pub fn new() -> Self {
        Default::default()
    }

    pub(crate) fn register(&self, entry: &Rc<Entry>) {
        self.subscribers.borrow_mut().push(Rc::downgrade(entry));
        entry.sources.borrow_mut().push(self.clone());
    }

    /// Notify every live subscriber, in registration order.
    ///
    /// The set is snapshotted first, so subscribers registered or released while
    /// notifying do not affect this round. Returns the number of updates performed.
    pub fn notify(&self) -> usize {
        let snapshot = self.subscribers.borrow().clone();
        let mut notified = 0;
        let mut stale = false;
        for weak in snapshot {
            match weak.upgrade() {
                Some(entry) => {
                    entry.subscriber.update();
                    notified += 1;
                }
                None => stale = true,
            }
        }
        if stale {
            self.subscribers
                .borrow_mut()
                .retain(|weak| weak.strong_count() > 0);
        }
        notified
    }

    /// Remove every registration of one subscriber entry.
    ///
    /// Matches by entry identity: ids are only unique within one runtime, and a set may
    /// hold subscribers of several runtimes.
    pub(crate) fn remove(&self, entry: &Entry) {
        let target: *const Entry = entry;
        self.subscribers
            .borrow_mut()
            .retain(|weak| weak.strong_count() > 0 && !std::ptr::eq(weak.as_ptr(), target));
    }

    /// Number of live registrations.
    pub fn len(&self) -> usize {
        self.subscribers
            .borrow()
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    /// Returns true if no live subscriber is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids of the live registrations, in notification order.
    pub fn subscribers(&self) -> Vec<SubscriberId> {
        self.subscribers
            .borrow()
            .iter()
            .filter_map(|weak| weak.upgrade().map(|entry| entry.id))
            .collect()
    }

    /// Returns true if both handles share the same set.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.subscribers, &other.subscribers)
    }
}

impl fmt::Debug for Dep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.subscribers()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Cell, Runtime};

    fn eq(a: &i32, b: &i32) -> bool {
        a == b
    }

    #[test]
    fn test_notify_in_registration_order() {
        let runtime = Runtime::new();
        let cell = Rc::new(Cell::new(0));
        let order = Rc::new(RefCell::new(Vec::new()));

        let mut ids = Vec::new();
        for tag in ["first", "second", "third"] {
            let source = cell.clone();
            let order = order.clone();
            ids.push(runtime.watch(
                move |cx| source.read(cx),
                eq,
                move |_| order.borrow_mut().push(tag),
            ));
        }

        assert_eq!(cell.dep().subscribers(), ids);
        assert_eq!(cell.dep().notify(), 3);
        // Value did not change, so no callback fired.
        assert!(order.borrow().is_empty());

        cell.write(1, eq);
        assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_duplicate_registration_fires_twice() {
        let runtime = Runtime::new();
        let cell = Rc::new(Cell::new(0));
        let reads = Rc::new(RefCell::new(0));

        let source = cell.clone();
        let counter = reads.clone();
        let id = runtime.watch(
            move |cx| {
                *counter.borrow_mut() += 1;
                source.read(cx);
                source.read(cx)
            },
            eq,
            |_| {},
        );

        assert_eq!(cell.dep().subscribers(), vec![id, id]);
        assert_eq!(runtime.sources(id), 2);

        *reads.borrow_mut() = 0;
        cell.write(1, eq);
        assert_eq!(*reads.borrow(), 2);
    }

    #[test]
    fn test_remove_keeps_same_id_from_other_runtime() {
        let first = Runtime::new();
        let second = Runtime::new();
        let cell = Rc::new(Cell::new(0));
        let fired = Rc::new(RefCell::new(Vec::new()));

        let mut ids = Vec::new();
        for (runtime, tag) in [(&first, "first"), (&second, "second")] {
            let source = cell.clone();
            let fired = fired.clone();
            ids.push(runtime.watch(
                move |cx| source.read(cx),
                eq,
                move |_| fired.borrow_mut().push(tag),
            ));
        }
        // Both runtimes hand out the same slab key.
        assert_eq!(ids[0], ids[1]);
        assert_eq!(cell.dep().len(), 2);

        assert!(first.release(ids[0]));
        assert_eq!(cell.dep().len(), 1);
        assert!(second.contains(ids[1]));

        cell.write(1, eq);
        assert_eq!(*fired.borrow(), vec!["second"]);
    }

    #[test]
    fn test_ptr_eq() {
        let a = Dep::new();
        let b = a.clone();
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&Dep::new()));
    }
}
