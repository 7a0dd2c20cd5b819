use super::escape::escape_into;

/// Serialize text as a JSON string value.
///
/// # Examples
///
/// ```
/// use deep_observe_util::strings::as_string;
///
/// assert_eq!(as_string("hello"), "\"hello\"");
/// assert_eq!(as_string("say \"hi\""), "\"say \\\"hi\\\"\"");
/// ```
pub fn as_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    write_quoted(&mut out, s);
    out
}

/// Appends `s` to `out` as a quoted JSON string.
pub fn write_quoted(out: &mut String, s: &str) {
    out.push('"');
    escape_into(out, s);
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_string_empty() {
        assert_eq!(as_string(""), "\"\"");
    }

    #[test]
    fn test_as_string_agrees_with_serde_json() {
        for s in ["plain", "back\\slash", "line1\nline2", "tab\there", "\u{0002}", "日本語"] {
            assert_eq!(as_string(s), serde_json::to_string(s).unwrap());
        }
    }
}
