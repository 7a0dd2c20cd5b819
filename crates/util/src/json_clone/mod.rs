//! Deep cloning of plain values.

mod clone;

pub use clone::deep_clone;
