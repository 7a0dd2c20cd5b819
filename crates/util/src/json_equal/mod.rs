//! Deep equality for plain values.
//!
//! Compares value trees recursively with loose scalar coercion, and stays
//! finite on cyclic graphs.

mod is_equal;

pub use is_equal::is_equal;
