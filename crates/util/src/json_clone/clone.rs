use std::collections::HashMap;

use crate::value::{Array, Object, Value};

/// Creates a deep clone of a value graph.
///
/// Every container is copied once: a container reachable along several paths
/// (or through a cycle) maps to a single copy, so the clone has the same
/// sharing and cycle structure as the source. Functions and host objects are
/// shared, not copied.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use deep_observe_util::{deep_clone, is_equal, Value};
///
/// let original = Value::from(json!({"foo": [1, 2, 3]}));
/// let cloned = deep_clone(&original);
///
/// assert!(is_equal(&original, &cloned));
/// assert!(!original.same(&cloned));
/// ```
pub fn deep_clone(value: &Value) -> Value {
    let mut copies = HashMap::new();
    clone_with(value, &mut copies)
}

fn clone_with(value: &Value, copies: &mut HashMap<usize, Value>) -> Value {
    match value {
        Value::Array(arr) => {
            if let Some(copy) = copies.get(&arr.id()) {
                return copy.clone();
            }
            let copy = Array::new();
            copies.insert(arr.id(), Value::Array(copy.clone()));
            for item in arr.items() {
                copy.push(clone_with(&item, copies));
            }
            Value::Array(copy)
        }
        Value::Object(obj) => {
            if let Some(copy) = copies.get(&obj.id()) {
                return copy.clone();
            }
            let copy = Object::new();
            copies.insert(obj.id(), Value::Object(copy.clone()));
            for (key, item) in obj.entries() {
                copy.insert(key, clone_with(&item, copies));
            }
            Value::Object(copy)
        }
        scalar => scalar.clone(),
    }
}
