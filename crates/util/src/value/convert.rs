use std::collections::HashSet;

use serde_json::{Map, Number};

use super::{Array, Function, Host, Object, Value};
use crate::stringify::REF_OBJECT_MARKER;

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

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Object> for Value {
    fn from(obj: Object) -> Self {
        Value::Object(obj)
    }
}

impl From<Array> for Value {
    fn from(arr: Array) -> Self {
        Value::Array(arr)
    }
}

impl From<Function> for Value {
    fn from(f: Function) -> Self {
        Value::Function(f)
    }
}

impl From<Host> for Value {
    fn from(h: Host) -> Self {
        Value::Host(h)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items.into_iter().collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

/// Builds fresh containers for every JSON array and object.
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<&serde_json::Value> for Value {
    fn from(json: &serde_json::Value) -> Self {
        Value::from(json.clone())
    }
}

impl Value {
    /// Converts to a `serde_json::Value` with `JSON.stringify` rules.
    ///
    /// `Undefined` and functions are dropped from objects and become `null`
    /// in arrays and at the top level. A container that is its own ancestor is
    /// replaced by the `"[refObject]"` marker.
    pub fn to_json(&self) -> serde_json::Value {
        let mut ancestors = HashSet::new();
        to_json_inner(self, &mut ancestors).unwrap_or(serde_json::Value::Null)
    }
}

fn to_json_inner(value: &Value, ancestors: &mut HashSet<usize>) -> Option<serde_json::Value> {
    let json = match value {
        Value::Undefined | Value::Function(_) => return None,
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => {
            json_number(*n).map_or(serde_json::Value::Null, serde_json::Value::Number)
        }
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Host(_) => serde_json::Value::Object(Map::new()),
        Value::Array(arr) => {
            if !ancestors.insert(arr.id()) {
                return Some(serde_json::Value::String(REF_OBJECT_MARKER.to_owned()));
            }
            let items = arr
                .borrow()
                .iter()
                .map(|item| to_json_inner(item, ancestors).unwrap_or(serde_json::Value::Null))
                .collect();
            ancestors.remove(&arr.id());
            serde_json::Value::Array(items)
        }
        Value::Object(obj) => {
            if !ancestors.insert(obj.id()) {
                return Some(serde_json::Value::String(REF_OBJECT_MARKER.to_owned()));
            }
            let mut map = Map::new();
            for (key, item) in obj.borrow().iter() {
                if let Some(json) = to_json_inner(item, ancestors) {
                    map.insert(key.clone(), json);
                }
            }
            ancestors.remove(&obj.id());
            serde_json::Value::Object(map)
        }
    };
    Some(json)
}

/// JSON number for `n`: integral values below 1e15 as integers, other finite
/// values as floats, `None` for NaN and infinities.
pub(crate) fn json_number(n: f64) -> Option<Number> {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        Some(Number::from(n as i64))
    } else {
        Number::from_f64(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_round_trip_keeps_shape() {
        let source = json!({
            "editable": true,
            "some": {"element": {"one": 1, "list": [1, "a", null]}}
        });
        let value = Value::from(source.clone());
        assert_eq!(value.to_json(), source);
    }

    #[test]
    fn to_json_drops_undefined_and_functions_in_objects() {
        let obj = Object::new();
        obj.insert("a", 1);
        obj.insert("u", Value::Undefined);
        obj.insert("f", Function::from_source("function() {}"));
        assert_eq!(Value::Object(obj).to_json(), json!({"a": 1}));
    }

    #[test]
    fn to_json_nulls_undefined_in_arrays() {
        let arr: Array = vec![Value::Undefined, Value::from(2)].into_iter().collect();
        assert_eq!(Value::Array(arr).to_json(), json!([null, 2]));
    }

    #[test]
    fn to_json_marks_cycles() {
        let obj = Object::new();
        obj.insert("a", 1);
        obj.insert("me", obj.clone());
        assert_eq!(
            Value::Object(obj).to_json(),
            json!({"a": 1, "me": "[refObject]"})
        );
    }
}
