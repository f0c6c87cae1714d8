//! Reading and writing fields by expression.
//!
//! An expression is a single field name, surrounding whitespace ignored. There is no
//! path syntax and no arithmetic: `user.name` names a field literally called `user.name`.

use vireo_reactive::ReadContext;

use crate::data::DataObject;
use crate::value::Value;

/// Read `expression` from `data` through its get trap.
///
/// Unknown fields yield [`Value::Undefined`].
pub fn read(expression: &str, data: &DataObject, cx: &ReadContext) -> Value {
    data.read(expression.trim(), cx)
}

/// Write `value` to `expression` on `data` through its set trap.
///
/// Returns true if the stored value changed.
pub fn write(expression: &str, data: &DataObject, value: Value) -> bool {
    data.set(expression.trim(), value)
}
