//! Change interception: turning plain fields into reactive cells.

use crate::data::DataObject;
use crate::value::Value;

/// Intercept a value recursively.
///
/// A no-op unless the value is an object. Otherwise every own field gets a reactive cell
/// (created once per field, never recreated) and the walk recurses into the field's
/// current value. Objects reachable more than once in a single walk are visited once, so
/// self-referencing data terminates.
pub fn observe(value: &Value) {
    let mut visited = ahash::HashSet::default();
    observe_with(value, &mut visited);
}

fn observe_with(value: &Value, visited: &mut ahash::HashSet<usize>) {
    let Value::Object(object) = value else {
        return;
    };
    if !visited.insert(object.addr()) {
        return;
    }
    intercept_fields(object, visited);
}

fn intercept_fields(object: &DataObject, visited: &mut ahash::HashSet<usize>) {
    for key in object.keys() {
        let nested = object.install(&key);
        observe_with(&nested, visited);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_primitives_are_ignored() {
        observe(&Value::from(1));
        observe(&Value::Undefined);
        observe(&vec![Value::from(1)].into());
    }

    #[test]
    fn test_nested_objects_are_intercepted() {
        let data = DataObject::from_json(json!({"user": {"name": "a"}, "n": 1})).unwrap();
        observe(&data.clone().into());

        assert!(data.is_intercepted("user"));
        assert!(data.is_intercepted("n"));
        let user = data.get("user");
        assert!(user.as_object().unwrap().is_intercepted("name"));
    }

    #[test]
    fn test_self_reference_terminates() {
        let data = DataObject::new().with("n", 1);
        data.set("me", data.clone());
        observe(&data.clone().into());
        assert!(data.is_intercepted("me"));
        // Break the cycle so the test does not leak.
        data.set("me", Value::Null);
    }
}
