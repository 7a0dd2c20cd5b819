//! deep-observe-util - plain values and the helpers that work on them.
//!
//! The helpers are usable on their own, without the observation layer:
//! [`is_equal`], [`stringify`], [`get`] and [`set`] by dot path, and
//! [`deep_clone`]. All of them are safe on cyclic graphs.

pub mod fuzzer;
pub mod json_clone;
pub mod json_equal;
pub mod path;
pub mod stringify;
pub mod strings;
pub mod value;

// Re-exports for convenience
pub use fuzzer::Fuzzer;
pub use json_clone::deep_clone;
pub use json_equal::is_equal;
pub use path::{get, set};
pub use stringify::{stringify, stringify_with, StringifyOptions, REF_OBJECT_MARKER};
pub use strings::{as_string, escape};
pub use value::{Array, Function, Host, Object, Value};
