//! String literal escaping for inline statements.
//!
//! Every value that is rendered into query text (rather than sent as a
//! binding) passes through [`quote_literal`]. Nothing else in the crate
//! builds a literal by hand.

use std::fmt::Write;

/// Render `value` as a single-quoted Gremlin/Groovy string literal.
///
/// Backslashes and single quotes are escaped, as are newline, carriage
/// return, tab, backspace and form feed. Any other control character is
/// written as a `\uXXXX` escape. Single-quoted literals are not
/// interpolated, so `$` needs no treatment.
pub fn quote_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Inverse of [`quote_literal`].
///
/// Returns `None` if `literal` is not a single, complete quoted literal, for
/// example when an unescaped quote terminates it early.
pub fn unquote_literal(literal: &str) -> Option<String> {
    let inner = literal.strip_prefix('\'')?.strip_suffix('\'')?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '\'' => return None,
            '\\' => match chars.next()? {
                '\\' => out.push('\\'),
                '\'' => out.push('\''),
                '"' => out.push('"'),
                'n' => out.push('\n'),
                'r' => out.push('\r'),
                't' => out.push('\t'),
                'b' => out.push('\u{8}'),
                'f' => out.push('\u{c}'),
                'u' => {
                    let hex: String = chars.by_ref().take(4).collect();
                    if hex.len() != 4 {
                        return None;
                    }
                    let code = u32::from_str_radix(&hex, 16).ok()?;
                    out.push(char::from_u32(code)?);
                }
                _ => return None,
            },
            c => out.push(c),
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOADS: &[&str] = &[
        "plain",
        "",
        "O'Brien",
        "x').drop().V('",
        "x'); g.V().drop(); //",
        "back\\slash",
        "trailing\\",
        "\\'",
        "line\nbreak\r\n",
        "tab\there",
        "nul\0byte",
        "bell\u{7}esc\u{1b}",
        "del\u{7f}c1\u{85}",
        "$dollar ${interp}",
        "\"double\"",
        "János Nagy",
    ];

    /// True if the literal's only unescaped quotes are the first and last char.
    fn closes_only_at_end(literal: &str) -> bool {
        let chars: Vec<char> = literal.chars().collect();
        if chars.len() < 2 || chars[0] != '\'' {
            return false;
        }
        let mut i = 1;
        while i < chars.len() {
            match chars[i] {
                '\\' => i += 2,
                '\'' => return i == chars.len() - 1,
                _ => i += 1,
            }
        }
        false
    }

    #[test]
    fn test_simple_quote() {
        assert_eq!(quote_literal("abc"), "'abc'");
        assert_eq!(quote_literal("O'Brien"), r"'O\'Brien'");
        assert_eq!(quote_literal(r"a\b"), r"'a\\b'");
    }

    #[test]
    fn test_payloads_never_terminate_early() {
        for payload in PAYLOADS {
            let quoted = quote_literal(payload);
            assert!(closes_only_at_end(&quoted), "{:?} -> {}", payload, quoted);
        }
    }

    #[test]
    fn test_payloads_round_trip() {
        for payload in PAYLOADS {
            assert_eq!(unquote_literal(&quote_literal(payload)).as_deref(), Some(*payload));
        }
    }

    #[test]
    fn test_control_characters_are_escaped() {
        for payload in PAYLOADS {
            let quoted = quote_literal(payload);
            assert!(!quoted.chars().any(|c| c.is_control()), "{:?}", quoted);
        }
        assert_eq!(quote_literal("\0"), r"'\u0000'");
    }

    #[test]
    fn test_unquote_rejects_broken_literals() {
        assert_eq!(unquote_literal("'a'b'"), None);
        assert_eq!(unquote_literal("'abc"), None);
        assert_eq!(unquote_literal("abc"), None);
        assert_eq!(unquote_literal(r"'\q'"), None);
        assert_eq!(unquote_literal(r"'\u12'"), None);
    }
}
