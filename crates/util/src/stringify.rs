//! Circular-safe JSON serialization of plain values.

use std::collections::HashSet;
use std::fmt::Write;

use serde::Deserialize;

use crate::strings::write_quoted;
use crate::value::{json_number, Value};

/// Written in place of a container that is its own ancestor.
pub const REF_OBJECT_MARKER: &str = "[refObject]";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StringifyOptions {
    /// Object keys skipped at any depth.
    pub exclude_keys: Vec<String>,
    /// Indent width for pretty output; `None` writes compact JSON.
    pub prettify: Option<usize>,
}

/// Serializes a value as compact JSON, replacing cyclic back-references with
/// `"[refObject]"`.
///
/// Only true cycles are replaced: a container that appears twice at sibling
/// positions is written twice.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use deep_observe_util::{stringify, Object, Value};
///
/// let obj = Object::new();
/// obj.insert("a", 1);
/// obj.insert("self", obj.clone());
/// assert_eq!(stringify(&Value::Object(obj)), r#"{"a":1,"self":"[refObject]"}"#);
/// assert_eq!(stringify(&Value::from(json!({}))), "{}");
/// ```
pub fn stringify(value: &Value) -> String {
    stringify_with(value, &StringifyOptions::default())
}

/// [`stringify`] with key exclusion and pretty printing.
pub fn stringify_with(value: &Value, options: &StringifyOptions) -> String {
    let mut writer = Writer {
        out: String::new(),
        ancestors: HashSet::new(),
        options,
        depth: 0,
    };
    if writer.write_value(value) {
        writer.out
    } else {
        "undefined".to_owned()
    }
}

struct Writer<'a> {
    out: String,
    ancestors: HashSet<usize>,
    options: &'a StringifyOptions,
    depth: usize,
}

impl Writer<'_> {
    /// Returns `false` when the value has no JSON form and nothing was written.
    fn write_value(&mut self, value: &Value) -> bool {
        match value {
            Value::Undefined | Value::Function(_) => return false,
            Value::Null => self.out.push_str("null"),
            Value::Bool(b) => self.out.push_str(if *b { "true" } else { "false" }),
            Value::Number(n) => self.write_number(*n),
            Value::String(s) => write_quoted(&mut self.out, s),
            Value::Host(_) => self.out.push_str("{}"),
            Value::Array(arr) => {
                if !self.ancestors.insert(arr.id()) {
                    write_quoted(&mut self.out, REF_OBJECT_MARKER);
                    return true;
                }
                let items = arr.borrow();
                self.out.push('[');
                self.depth += 1;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.out.push(',');
                    }
                    self.newline();
                    if !self.write_value(item) {
                        self.out.push_str("null");
                    }
                }
                self.depth -= 1;
                if !items.is_empty() {
                    self.newline();
                }
                self.out.push(']');
                self.ancestors.remove(&arr.id());
            }
            Value::Object(obj) => {
                if !self.ancestors.insert(obj.id()) {
                    write_quoted(&mut self.out, REF_OBJECT_MARKER);
                    return true;
                }
                let entries = obj.borrow();
                self.out.push('{');
                self.depth += 1;
                let mut written = 0usize;
                for (key, item) in entries.iter() {
                    if matches!(item, Value::Undefined | Value::Function(_))
                        || self.options.exclude_keys.iter().any(|k| k == key)
                    {
                        continue;
                    }
                    if written > 0 {
                        self.out.push(',');
                    }
                    self.newline();
                    write_quoted(&mut self.out, key);
                    self.out.push(':');
                    if self.options.prettify.is_some() {
                        self.out.push(' ');
                    }
                    self.write_value(item);
                    written += 1;
                }
                self.depth -= 1;
                if written > 0 {
                    self.newline();
                }
                self.out.push('}');
                self.ancestors.remove(&obj.id());
            }
        }
        true
    }

    fn write_number(&mut self, n: f64) {
        match json_number(n) {
            // Writing into a String cannot fail
            Some(number) => {
                let _ = write!(self.out, "{number}");
            }
            None => self.out.push_str("null"),
        }
    }

    fn newline(&mut self) {
        if let Some(indent) = self.options.prettify {
            self.out.push('\n');
            self.out
                .extend(std::iter::repeat(' ').take(indent * self.depth));
        }
    }
}
