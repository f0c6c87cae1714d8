use std::cell::RefCell;

use crate::tracking::ReadContext;

/// Anything a [`Dep`](crate::Dep) can notify.
pub trait Subscriber {
    /// Re-evaluate after a dependency changed.
    fn update(&self);
}

/// The subscriber created by [`Runtime::watch`](crate::Runtime::watch).
///
/// Holds a read function, the last value it produced, and a callback fired on change.
pub struct Watcher<T> {
    read: Box<dyn Fn(&ReadContext) -> T>,
    eq: fn(&T, &T) -> bool,
    callback: Box<dyn Fn(&T)>,
    last: RefCell<Option<T>>,
}

impl<T: Clone> Watcher<T> {
    pub(crate) fn new(
        read: impl Fn(&ReadContext) -> T + 'static,
        eq: fn(&T, &T) -> bool,
        callback: impl Fn(&T) + 'static,
    ) -> Self {
        Self {
            read: Box::new(read),
            eq,
            callback: Box::new(callback),
            last: RefCell::new(None),
        }
    }

    /// Seeding read. The only read that runs with a tracking context.
    pub(crate) fn seed(&self, cx: &ReadContext) {
        let value = (self.read)(cx);
        *self.last.borrow_mut() = Some(value);
    }

    /// The last value this watcher observed.
    pub fn last(&self) -> Option<T> {
        self.last.borrow().clone()
    }
}

impl<T: Clone> Subscriber for Watcher<T> {
    fn update(&self) {
        let value = (self.read)(&ReadContext::untracked());
        let changed = match &*self.last.borrow() {
            Some(last) => !(self.eq)(last, &value),
            None => true,
        };
        if !changed {
            return;
        }
        // Cache first: the callback may write data that re-enters this watcher.
        *self.last.borrow_mut() = Some(value.clone());
        (self.callback)(&value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_update_is_idempotent() {
        let source = Rc::new(std::cell::Cell::new(1));
        let fired = Rc::new(RefCell::new(Vec::new()));

        let s = source.clone();
        let f = fired.clone();
        let watcher = Watcher::new(
            move |_| s.get(),
            |a: &i32, b: &i32| a == b,
            move |v| f.borrow_mut().push(*v),
        );
        watcher.seed(&ReadContext::untracked());
        assert_eq!(watcher.last(), Some(1));

        source.set(2);
        watcher.update();
        watcher.update();
        assert_eq!(*fired.borrow(), vec![2]);
        assert_eq!(watcher.last(), Some(2));
    }

    #[test]
    fn test_reentrant_update_fires_once() {
        let source = Rc::new(std::cell::Cell::new(1));
        let fired = Rc::new(RefCell::new(0));
        let slot: Rc<RefCell<Option<Rc<Watcher<i32>>>>> = Rc::new(RefCell::new(None));

        let s = source.clone();
        let f = fired.clone();
        let inner = slot.clone();
        let watcher = Rc::new(Watcher::new(
            move |_| s.get(),
            |a: &i32, b: &i32| a == b,
            move |_| {
                *f.borrow_mut() += 1;
                if let Some(w) = inner.borrow().as_ref() {
                    w.update();
                }
            },
        ));
        watcher.seed(&ReadContext::untracked());
        *slot.borrow_mut() = Some(watcher.clone());

        source.set(2);
        watcher.update();
        assert_eq!(*fired.borrow(), 1);

        slot.borrow_mut().take();
    }
}
