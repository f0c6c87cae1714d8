//! Data objects: the host-owned field maps the engine observes.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use vireo_reactive::{Cell, Dep, ReadContext, RevisionCounter};

use crate::observer;
use crate::value::Value;

/// A field slot. Fields start plain and become reactive when the object is intercepted.
#[derive(Clone)]
pub(crate) enum Field {
    Plain(Value),
    Reactive(Rc<Cell<Value>>),
}

/// A mapping from field name to [`Value`], in insertion order.
///
/// This is a shared handle: clones refer to the same fields, and the engine mutates
/// fields in place rather than copying the object. After [`DataObject::intercept`]
/// every field carries its own dependency set.
#[derive(Clone, Default)]
pub struct DataObject {
    fields: Rc<RefCell<IndexMap<String, Field>>>,
}

impl DataObject {
    /// Create an empty data object.
    pub fn new() -> Self {
        Default::default()
    }

    /// Build a data object from a JSON value.
    ///
    /// Returns `None` unless the value is a JSON object. Nested objects become nested
    /// data objects and arrays become [`Array`](crate::Array)s; key order is preserved.
    pub fn from_json(json: serde_json::Value) -> Option<Self> {
        match Value::from(json) {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Read a field without tracking. Unknown fields yield `Undefined`.
    pub fn get(&self, key: &str) -> Value {
        self.read(key, &ReadContext::untracked())
    }

    /// Read a field through the get trap.
    ///
    /// If `cx` is tracking and the field is reactive, the context's subscriber is added to
    /// the field's dependency set.
    pub fn read(&self, key: &str, cx: &ReadContext) -> Value {
        let field = self.fields.borrow().get(key).cloned();
        match field {
            Some(Field::Reactive(cell)) => cell.read(cx),
            Some(Field::Plain(value)) => value,
            None => Value::Undefined,
        }
    }

    /// Write a field through the set trap.
    ///
    /// For a reactive field: if the new value is [`Value::same_value`] to the current one,
    /// nothing happens. Otherwise the new value is intercepted (if it is an object), stored,
    /// and the field's dependency set is notified synchronously before this returns.
    ///
    /// Plain and unknown fields are simply assigned; an unknown field is added as a plain
    /// (untracked) field.
    ///
    /// Returns true if the stored value changed.
    pub fn set(&self, key: &str, value: impl Into<Value>) -> bool {
        let value = value.into();
        let field = self.fields.borrow().get(key).cloned();
        match field {
            Some(Field::Reactive(cell)) => {
                if cell.with(|old| Value::same_value(old, &value)) {
                    return false;
                }
                observer::observe(&value);
                cell.set(value);
                cell.dep().notify();
                true
            }
            Some(Field::Plain(old)) => {
                let changed = !Value::same_value(&old, &value);
                self.fields
                    .borrow_mut()
                    .insert(key.to_string(), Field::Plain(value));
                changed
            }
            None => {
                self.fields
                    .borrow_mut()
                    .insert(key.to_string(), Field::Plain(value));
                true
            }
        }
    }

    /// Builder-style [`DataObject::set`].
    pub fn with(self, key: &str, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Field names in insertion order.
    pub fn keys(&self) -> Vec<String> {
        self.fields.borrow().keys().cloned().collect()
    }

    /// Returns true if the field exists.
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.borrow().contains_key(key)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.borrow().len()
    }

    /// Returns true if there are no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.borrow().is_empty()
    }

    /// Returns true if the field exists and has been intercepted.
    pub fn is_intercepted(&self, key: &str) -> bool {
        matches!(self.fields.borrow().get(key), Some(Field::Reactive(_)))
    }

    /// The dependency set of an intercepted field.
    pub fn dep(&self, key: &str) -> Option<Dep> {
        match self.fields.borrow().get(key) {
            Some(Field::Reactive(cell)) => Some(cell.dep().clone()),
            _ => None,
        }
    }

    /// Number of subscribers registered on an intercepted field.
    pub fn dep_len(&self, key: &str) -> Option<usize> {
        self.dep(key).map(|dep| dep.len())
    }

    /// Number of changes an intercepted field has seen since interception.
    pub fn changed_at(&self, key: &str) -> Option<RevisionCounter> {
        match self.fields.borrow().get(key) {
            Some(Field::Reactive(cell)) => Some(cell.changed_at()),
            _ => None,
        }
    }

    /// Install get/set interception on every field, recursively.
    ///
    /// Fields that are already intercepted keep their dependency set; only their nested
    /// value is revisited.
    pub fn intercept(&self) {
        observer::observe(&Value::Object(self.clone()));
    }

    /// Returns true if both handles refer to the same object.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.fields, &other.fields)
    }

    pub(crate) fn addr(&self) -> usize {
        Rc::as_ptr(&self.fields) as *const () as usize
    }

    /// Turn one field reactive if it is not already; returns its current value.
    pub(crate) fn install(&self, key: &str) -> Value {
        let mut fields = self.fields.borrow_mut();
        let Some(field) = fields.get_mut(key) else {
            return Value::Undefined;
        };
        match field {
            Field::Reactive(cell) => cell.get(),
            Field::Plain(value) => {
                let value = value.clone();
                *field = Field::Reactive(Rc::new(Cell::new(value.clone())));
                value
            }
        }
    }
}

impl fmt::Debug for DataObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for key in self.keys() {
            map.entry(&key, &self.get(&key));
        }
        map.finish()
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for DataObject {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        let object = DataObject::new();
        for (key, value) in map {
            object.set(&key, Value::from(value));
        }
        object
    }
}
