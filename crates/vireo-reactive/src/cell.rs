use std::cell::RefCell;
use std::fmt;

use crate::dep::Dep;
use crate::tracking::ReadContext;

/// Revision counter type - incremented once per change of a cell's value.
pub type RevisionCounter = u64;

/// A reactive cell: a value plus the dependency set of its readers.
///
/// The dependency set is created with the cell and lives as long as it does; writes
/// only replace the value.
pub struct Cell<T> {
    value: RefCell<T>,
    dep: Dep,
    changed_at: std::cell::Cell<RevisionCounter>,
}

impl<T> Cell<T> {
    /// Create a new cell with an empty dependency set.
    pub fn new(value: T) -> Self {
        Self {
            value: RefCell::new(value),
            dep: Dep::new(),
            changed_at: std::cell::Cell::new(0),
        }
    }

    /// Read the value, registering the context's subscriber if it is tracking.
    pub fn read(&self, cx: &ReadContext) -> T
    where
        T: Clone,
    {
        if let Some(entry) = cx.entry() {
            self.dep.register(entry);
        }
        self.value.borrow().clone()
    }

    /// Read the value without registering anything.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.value.borrow().clone()
    }

    /// Borrow the value without registering anything.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.value.borrow())
    }

    /// Replace the value without comparing or notifying.
    ///
    /// Returns the previous value.
    pub fn set(&self, value: T) -> T {
        self.changed_at.set(self.changed_at.get() + 1);
        self.value.replace(value)
    }

    /// Replace the value if `eq` says it differs. Does not notify.
    pub fn replace(&self, value: T, eq: fn(&T, &T) -> bool) -> bool {
        if self.with(|old| eq(old, &value)) {
            return false;
        }
        self.set(value);
        true
    }

    /// Replace the value if `eq` says it differs, then notify the dependency set.
    ///
    /// Notification happens synchronously, after the new value is stored, and no borrow
    /// of the value is held while subscribers run.
    pub fn write(&self, value: T, eq: fn(&T, &T) -> bool) -> bool {
        if !self.replace(value, eq) {
            return false;
        }
        self.dep.notify();
        true
    }

    /// The dependency set of this cell.
    pub fn dep(&self) -> &Dep {
        &self.dep
    }

    /// Number of changes since creation.
    pub fn changed_at(&self) -> RevisionCounter {
        self.changed_at.get()
    }
}

impl<T: fmt::Debug> fmt::Debug for Cell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cell")
            .field("value", &*self.value.borrow())
            .field("dep", &self.dep)
            .field("changed_at", &self.changed_at.get())
            .finish()
    }
}
