//! String escaping for JSON output.

mod as_string;
mod escape;

pub use as_string::{as_string, write_quoted};
pub use escape::{escape, escape_into};
