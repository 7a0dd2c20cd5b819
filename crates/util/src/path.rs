//! Dot-path access into plain values.
//!
//! A path is a `.`-separated list of segments, e.g. `some.element.one`.
//! Object segments are keys; array segments are decimal indices.

use crate::value::{Object, Value};

/// Splits a dot path into its segments. The empty path has no segments.
pub fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('.').filter(move |_| !path.is_empty())
}

/// Joins a parent path and a key; the root has an empty path.
pub fn join_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        return key.to_owned();
    }
    let mut out = String::with_capacity(parent.len() + key.len() + 1);
    out.push_str(parent);
    out.push('.');
    out.push_str(key);
    out
}

/// Iterates `path` and its ancestors, most specific first: `a.b.c`, `a.b`, `a`.
///
/// # Examples
///
/// ```
/// use deep_observe_util::path::ancestors;
///
/// let all: Vec<&str> = ancestors("some.element.one").collect();
/// assert_eq!(all, vec!["some.element.one", "some.element", "some"]);
/// ```
pub fn ancestors(path: &str) -> impl Iterator<Item = &str> {
    let mut rest = Some(path).filter(|p| !p.is_empty());
    std::iter::from_fn(move || {
        let current = rest?;
        rest = current.rfind('.').map(|dot| &current[..dot]);
        Some(current)
    })
}

/// Value stored directly under `segment`, if `value` is a container holding it.
pub fn child(value: &Value, segment: &str) -> Option<Value> {
    match value {
        Value::Object(obj) => obj.get(segment),
        Value::Array(arr) => segment.parse::<usize>().ok().and_then(|i| arr.get(i)),
        _ => None,
    }
}

/// Writes `new_value` under `segment` of a container.
///
/// Returns `false` when `container` is not a container, or when it is an
/// array and `segment` is not an index or lies too far past the end (see
/// [`MAX_ARRAY_GAP`](crate::value::MAX_ARRAY_GAP)).
pub fn assign(container: &Value, segment: &str, new_value: Value) -> bool {
    match container {
        Value::Object(obj) => {
            obj.insert(segment, new_value);
            true
        }
        Value::Array(arr) => segment
            .parse::<usize>()
            .is_ok_and(|index| arr.set(index, new_value)),
        _ => false,
    }
}

/// Get a value by dot path.
///
/// Returns `Undefined` when the path is empty or any segment is missing.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use deep_observe_util::{get, Value};
///
/// let doc = Value::from(json!({"some": {"list": [10, 20]}}));
/// assert_eq!(get("some.list.1", &doc).as_f64(), Some(20.0));
/// assert!(get("some.missing.deep", &doc).is_undefined());
/// ```
pub fn get(path: &str, value: &Value) -> Value {
    if path.is_empty() {
        return Value::Undefined;
    }
    let mut current = value.clone();
    for segment in split_path(path) {
        current = match child(&current, segment) {
            Some(next) => next,
            None => return Value::Undefined,
        };
    }
    current
}

/// Set a value by dot path, creating intermediate objects for missing or
/// scalar segments.
///
/// Returns `false` (and writes nothing) when the path is empty or `root` is
/// not a container.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use deep_observe_util::{get, set, Value};
///
/// let doc = Value::from(json!({}));
/// assert!(set("a.b.c", Value::from(1), &doc));
/// assert_eq!(doc.to_json(), json!({"a": {"b": {"c": 1}}}));
/// ```
pub fn set(path: &str, new_value: Value, root: &Value) -> bool {
    if !root.is_container() {
        return false;
    }
    let segments: Vec<&str> = split_path(path).collect();
    let Some((last, parents)) = segments.split_last() else {
        return false;
    };
    let Some(parent) = ensure_containers(root, parents) else {
        return false;
    };
    assign(&parent, last, new_value)
}

/// Walks `segments` from `root`, replacing missing or scalar members with
/// fresh objects, and returns the container at the end of the walk.
pub fn ensure_containers(root: &Value, segments: &[&str]) -> Option<Value> {
    let mut current = root.clone();
    for segment in segments {
        current = match child(&current, segment) {
            Some(next) if next.is_container() => next,
            _ => {
                let fresh = Value::Object(Object::new());
                if !assign(&current, segment, fresh.clone()) {
                    return None;
                }
                fresh
            }
        };
    }
    Some(current)
}
