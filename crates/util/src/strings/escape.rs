use std::fmt::Write;

/// Escape special characters in a string for JSON serialization.
///
/// Escapes control characters (0x00-0x1F), the double quote and the backslash.
///
/// # Examples
///
/// ```
/// use deep_observe_util::strings::escape;
///
/// assert_eq!(escape("hello"), "hello");
/// assert_eq!(escape("say \"hi\""), "say \\\"hi\\\"");
/// assert_eq!(escape("line1\nline2"), "line1\\nline2");
/// ```
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    escape_into(&mut out, s);
    out
}

/// Appends the escaped form of `s` to `out`.
pub fn escape_into(out: &mut String, s: &str) {
    let mut last = 0;
    for (i, ch) in s.char_indices() {
        let short = match ch {
            '"' => "\\\"",
            '\\' => "\\\\",
            '\n' => "\\n",
            '\r' => "\\r",
            '\t' => "\\t",
            '\u{0008}' => "\\b",
            '\u{000C}' => "\\f",
            c if (c as u32) < 0x20 => "",
            _ => continue,
        };
        out.push_str(&s[last..i]);
        if short.is_empty() {
            // Writing into a String cannot fail
            let _ = write!(out, "\\u{:04x}", ch as u32);
        } else {
            out.push_str(short);
        }
        last = i + ch.len_utf8();
    }
    out.push_str(&s[last..]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_simple() {
        assert_eq!(escape("hello"), "hello");
    }

    #[test]
    fn test_escape_quotes_and_backslash() {
        assert_eq!(escape(r#"a"b\c"#), r#"a\"b\\c"#);
    }

    #[test]
    fn test_escape_control_characters() {
        assert_eq!(escape("\u{0001}"), "\\u0001");
        assert_eq!(escape("\u{001f}"), "\\u001f");
        assert_eq!(escape("\u{0008}\u{000C}"), "\\b\\f");
        assert_eq!(escape("a\tb\r\n"), "a\\tb\\r\\n");
    }

    #[test]
    fn test_escape_keeps_unicode() {
        assert_eq!(escape("hello 日本語"), "hello 日本語");
    }
}
