//! Dynamic values stored in data objects.

use std::fmt;
use std::rc::Rc;

use crate::data::DataObject;

/// An array value.
///
/// Arrays are opaque to the engine: they are never diffed or intercepted element-wise,
/// and compare by identity.
#[derive(Clone, Default)]
pub struct Array(Rc<Vec<Value>>);

impl Array {
    /// Create an array from its elements.
    pub fn new(values: Vec<Value>) -> Self {
        Array(Rc::new(values))
    }

    /// Returns true if both handles are the same array.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no elements.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the elements.
    pub fn iter(&self) -> impl Iterator<Item = &Value> + '_ {
        self.0.iter()
    }

    /// Element at `index`.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }
}

impl fmt::Debug for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

impl FromIterator<Value> for Array {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Array(Rc::new(iter.into_iter().collect()))
    }
}

/// A field value.
#[derive(Clone, Default)]
pub enum Value {
    /// Absent value; what reading an unknown field yields.
    #[default]
    Undefined,
    /// Explicit null.
    Null,
    /// Boolean.
    Bool(bool),
    /// Number.
    Number(f64),
    /// String.
    String(String),
    /// Array, compared by identity.
    Array(Array),
    /// Nested data object, compared by identity and intercepted recursively.
    Object(DataObject),
}

impl Value {
    /// Change-detection equality.
    ///
    /// Primitives compare by value (`NaN` never equals itself); arrays and objects compare
    /// by identity. This is the only check standing between a write and a notification.
    pub fn same_value(a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a.ptr_eq(b),
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Returns true for `Undefined`.
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// The nested data object, if this is one.
    pub fn as_object(&self) -> Option<&DataObject> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// The string, if this is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The number, if this is one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The boolean, if this is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Text written into a node for this value.
    ///
    /// `Undefined` and `Null` render as the empty string, integral numbers without a
    /// fractional part, arrays as their comma-joined elements.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Undefined | Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::String(s) => s.clone(),
            Value::Array(array) => array
                .iter()
                .map(Value::to_display_string)
                .collect::<Vec<_>>()
                .join(","),
            Value::Object(_) => "[object Object]".to_string(),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == 0.0 {
        // Covers -0 as well.
        "0".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{n:.0}")
    } else {
        n.to_string()
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Array(array) => fmt::Debug::fmt(array, f),
            Value::Object(object) => fmt::Debug::fmt(object, f),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display_string())
    }
}

/// Structural equality, for assertions. Change detection uses [`Value::same_value`].
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Array(a), Value::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(a, b)| a == b)
            }
            (Value::Object(a), Value::Object(b)) => {
                a.ptr_eq(b)
                    || (a.keys() == b.keys() && a.keys().iter().all(|k| a.get(k) == b.get(k)))
            }
            _ => Value::same_value(self, other),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::Number(n as f64)
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize, f32);

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Value::Array(Array::new(values))
    }
}

impl From<Array> for Value {
    fn from(array: Array) -> Self {
        Value::Array(array)
    }
}

impl From<DataObject> for Value {
    fn from(object: DataObject) -> Self {
        Value::Object(object)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(values) => {
                Value::Array(values.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                let object = DataObject::new();
                for (key, value) in map {
                    object.set(&key, Value::from(value));
                }
                Value::Object(object)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_same_value_primitives() {
        assert!(Value::same_value(&Value::from(1), &Value::from(1.0)));
        assert!(Value::same_value(&"a".into(), &"a".into()));
        assert!(!Value::same_value(&Value::from(1), &"1".into()));
        assert!(!Value::same_value(&Value::Null, &Value::Undefined));
        assert!(!Value::same_value(
            &Value::Number(f64::NAN),
            &Value::Number(f64::NAN)
        ));
    }

    #[test]
    fn test_same_value_by_identity() {
        let array = Array::new(vec![1.into()]);
        assert!(Value::same_value(
            &array.clone().into(),
            &array.clone().into()
        ));
        let other: Value = vec![Value::from(1)].into();
        assert!(!Value::same_value(&array.clone().into(), &other));
        // Structurally equal though.
        assert_eq!(Value::from(array), other);

        let object = DataObject::new();
        assert!(Value::same_value(
            &object.clone().into(),
            &object.clone().into()
        ));
        assert!(!Value::same_value(
            &object.into(),
            &DataObject::new().into()
        ));
    }

    #[test]
    fn test_display_string() {
        assert_eq!(Value::Undefined.to_display_string(), "");
        assert_eq!(Value::Null.to_display_string(), "");
        assert_eq!(Value::from(1).to_display_string(), "1");
        assert_eq!(Value::from(-0.0).to_display_string(), "0");
        assert_eq!(Value::from(2.5).to_display_string(), "2.5");
        assert_eq!(Value::from(true).to_display_string(), "true");
        assert_eq!(Value::Number(f64::NAN).to_display_string(), "NaN");
        assert_eq!(
            Value::from(json!([1, "a", null])).to_display_string(),
            "1,a,"
        );
        assert_eq!(
            Value::from(json!({"a": 1})).to_display_string(),
            "[object Object]"
        );
    }

    #[test]
    fn test_from_json_keeps_order() {
        let value = Value::from(json!({"b": 1, "a": {"c": true}}));
        let object = value.as_object().unwrap();
        assert_eq!(object.keys(), vec!["b", "a"]);
        let nested = object.get("a");
        assert_eq!(nested.as_object().unwrap().get("c"), Value::Bool(true));
    }
}
