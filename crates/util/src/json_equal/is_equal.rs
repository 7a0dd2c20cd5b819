use std::collections::HashSet;

use crate::value::Value;

/// Pairs of containers `(left id, right id)` already under comparison.
type Visited = HashSet<(usize, usize)>;

/// Performs a deep, cycle-safe equality check between two values.
///
/// - Identical references are equal.
/// - Scalars follow weak equality: `1 == "1"`, `true == 1`, `null == undefined`.
/// - Functions compare by source text.
/// - Arrays compare length and items pairwise; objects compare key sets and
///   values pairwise. Key order is ignored.
/// - A pair of containers met again while it is still being compared counts as
///   equal, so mutually referencing graphs terminate.
/// - Host objects are only equal to themselves.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use deep_observe_util::{is_equal, Value};
///
/// let a = Value::from(json!({"foo": [1, 2, 3]}));
/// let b = Value::from(json!({"foo": [1, 2, 3]}));
/// let c = Value::from(json!({"foo": [1, 2, 4]}));
///
/// assert!(is_equal(&a, &b));
/// assert!(!is_equal(&a, &c));
/// assert!(is_equal(&Value::from(1), &Value::from("1")));
/// ```
pub fn is_equal(a: &Value, b: &Value) -> bool {
    let mut visited = Visited::new();
    equal_with(a, b, &mut visited)
}

fn equal_with(a: &Value, b: &Value, visited: &mut Visited) -> bool {
    match (a, b) {
        (Value::Array(left), Value::Array(right)) => {
            if left.ptr_eq(right) || !visited.insert((left.id(), right.id())) {
                return true;
            }
            let (left, right) = (left.borrow(), right.borrow());
            left.len() == right.len()
                && left
                    .iter()
                    .zip(right.iter())
                    .all(|(l, r)| equal_with(l, r, visited))
        }
        (Value::Object(left), Value::Object(right)) => {
            if left.ptr_eq(right) || !visited.insert((left.id(), right.id())) {
                return true;
            }
            let (left, right) = (left.borrow(), right.borrow());
            left.len() == right.len()
                && left.iter().all(|(key, l)| match right.get(key) {
                    Some(r) => equal_with(l, r, visited),
                    None => false,
                })
        }
        (Value::Function(left), Value::Function(right)) => {
            left.ptr_eq(right) || left.source() == right.source()
        }
        (Value::Host(left), Value::Host(right)) => left.ptr_eq(right),

        // Containers, functions and host objects never equal a different kind
        (Value::Array(_) | Value::Object(_) | Value::Function(_) | Value::Host(_), _)
        | (_, Value::Array(_) | Value::Object(_) | Value::Function(_) | Value::Host(_)) => false,

        _ => loose_scalar_equal(a, b),
    }
}

fn loose_scalar_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Undefined | Value::Null, Value::Undefined | Value::Null) => true,
        (Value::Undefined | Value::Null, _) | (_, Value::Undefined | Value::Null) => false,
        (Value::String(l), Value::String(r)) => l == r,
        (Value::Bool(l), Value::Bool(r)) => l == r,
        // NaN equals itself here so that every value is equal to itself
        (Value::Number(l), Value::Number(r)) => l == r || (l.is_nan() && r.is_nan()),
        _ => match (to_number(a), to_number(b)) {
            (Some(l), Some(r)) => l == r,
            _ => false,
        },
    }
}

fn to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => Some(*n),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => Some(string_to_number(s)),
        _ => None,
    }
}

/// Numeric conversion of a string with scripting-language rules.
pub(crate) fn string_to_number(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    let radix = match trimmed.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return radix_to_number(&trimmed[2..], radix);
    }
    if trimmed
        .chars()
        .any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E')
    {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// Unsigned digits in `radix`; no sign, at least one digit. Values wider
/// than 64 bits keep growing as floats.
fn radix_to_number(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    digits
        .chars()
        .try_fold(0.0_f64, |acc, c| {
            c.to_digit(radix)
                .map(|d| acc * f64::from(radix) + f64::from(d))
        })
        .unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Array, Function, Host, Object};
    use serde_json::json;

    fn v(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    fn test_object() -> Object {
        match v(json!({
            "editable": true,
            "disabled": false,
            "some": {"element": {"enable": true, "one": 1, "two": 2}}
        })) {
            Value::Object(obj) => obj,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_same_reference_is_equal() {
        let a = Value::Object(Object::new());
        let b = Value::Array(Array::new());
        assert!(is_equal(&a, &a));
        assert!(is_equal(&b, &b));
        assert!(!is_equal(&a, &b));
    }

    #[test]
    fn test_functions_compare_by_source() {
        let noop_a = Value::Function(Function::from_source("function() {}"));
        let noop_b = Value::Function(Function::from_source("function() {}"));
        let one = Value::Function(Function::new("function() { return 1; }", |_| Value::from(1)));
        assert!(is_equal(&noop_a, &noop_b));
        assert!(!is_equal(&one, &noop_a));
    }

    #[test]
    fn test_scalars() {
        assert!(is_equal(&Value::from(1), &Value::from(1)));
        assert!(!is_equal(&Value::from(1), &Value::from(2)));
        assert!(is_equal(&Value::from(true), &Value::from(true)));
        assert!(is_equal(&Value::from(1.0), &Value::from(1)));
        assert!(is_equal(&Value::from("1"), &Value::from(1)));
    }

    #[test]
    fn test_loose_coercion_edges() {
        assert!(is_equal(&Value::Null, &Value::Undefined));
        assert!(!is_equal(&Value::Null, &Value::from(0)));
        assert!(is_equal(&Value::from(true), &Value::from(1)));
        assert!(is_equal(&Value::from(""), &Value::from(0)));
        assert!(!is_equal(&Value::from("abc"), &Value::from(0)));
        assert!(is_equal(&Value::from("0x10"), &Value::from(16)));
        assert!(!is_equal(&Value::from("a"), &Value::from("b")));
    }

    #[test]
    fn test_nan_is_reflexive() {
        let nan = Value::from(f64::NAN);
        assert!(is_equal(&nan, &nan.clone()));
        assert!(!is_equal(&Value::from("nope"), &nan));
    }

    #[test]
    fn test_arrays() {
        assert!(is_equal(&v(json!([1])), &v(json!([1]))));
        assert!(!is_equal(&v(json!([1])), &v(json!([2]))));
        assert!(is_equal(&v(json!(["test"])), &v(json!(["test"]))));
        assert!(!is_equal(&v(json!(["test"])), &v(json!(["test", 1]))));
    }

    #[test]
    fn test_objects_ignore_key_order() {
        assert!(is_equal(
            &v(json!({"a": 1, "b": "2"})),
            &v(json!({"b": "2", "a": 1}))
        ));
        assert!(!is_equal(
            &v(json!({"a": 1, "b": "2", "c": 3})),
            &v(json!({"a": 1, "b": "2", "d": 3}))
        ));
    }

    #[test]
    fn test_mutual_cycle() {
        let a = test_object();
        let b = test_object();
        assert!(is_equal(&Value::Object(a.clone()), &Value::Object(b.clone())));

        a.insert("b", b.clone());
        b.insert("b", a.clone());
        assert!(is_equal(&Value::Object(a.clone()), &Value::Object(b.clone())));

        a.insert("b", 1);
        b.insert("b", 2);
        assert!(!is_equal(&Value::Object(a), &Value::Object(b)));
    }

    #[test]
    fn test_self_cycle_is_reflexive() {
        let a = test_object();
        a.insert("me", a.clone());
        let value = Value::Object(a);
        assert!(is_equal(&value, &value.clone()));
    }

    #[test]
    fn test_difference_inside_cycle() {
        let a = test_object();
        let b = test_object();
        a.insert("b", b.clone());
        b.insert("b", a.clone());
        if let Some(Value::Object(some)) = a.get("some") {
            some.insert("extra", "x");
        }
        assert!(!is_equal(&Value::Object(a), &Value::Object(b)));
    }

    #[test]
    fn test_host_objects() {
        let window = Value::Host(Host::new("window"));
        let document = Value::Host(Host::new("document"));
        assert!(!is_equal(&window, &document));
        assert!(is_equal(&window, &window.clone()));
        assert!(!is_equal(&window, &Value::Object(Object::new())));
    }

    #[test]
    fn test_string_to_number() {
        assert_eq!(string_to_number(" 42 "), 42.0);
        assert_eq!(string_to_number("1e3"), 1000.0);
        assert_eq!(string_to_number("-Infinity"), f64::NEG_INFINITY);
        assert!(string_to_number("inf").is_nan());
    }

    #[test]
    fn test_string_to_number_radix_prefixes() {
        assert_eq!(string_to_number("0x1F"), 31.0);
        assert_eq!(string_to_number("0o17"), 15.0);
        assert_eq!(string_to_number("0B101"), 5.0);
        assert!(string_to_number("0x+1").is_nan());
        assert!(string_to_number("0x-1").is_nan());
        assert!(string_to_number("-0x10").is_nan());
        assert!(string_to_number("0x").is_nan());
        assert!(string_to_number("0b12").is_nan());
        assert_eq!(string_to_number("0x10000000000000000"), 2f64.powi(64));
        assert!(is_equal(&Value::from("0b11"), &Value::from(3)));
        assert!(!is_equal(&Value::from("0x+1"), &Value::from(1)));
    }
}
