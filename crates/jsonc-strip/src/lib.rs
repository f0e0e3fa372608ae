//! JSONC helpers for policy files and the diagnostics catalogue.
//!
//! Supports:
//! - `//` line comments
//! - `/* ... */` block comments
//! - trailing commas before `}` or `]`
//!
//! String literals (including escaped quotes) are always copied verbatim.

/// Strip `//` and `/* */` comments from JSONC input.
///
/// Comment-like sequences inside string literals are preserved. Line
/// comments keep their terminating newline so that line numbers reported
/// by `serde_json` still match the original file.
#[must_use]
pub fn strip_jsonc(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_str = false;

    while let Some(c) = chars.next() {
        if in_str {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_str = false,
                _ => {}
            }
            continue;
        }

        match (c, chars.peek()) {
            ('"', _) => {
                in_str = true;
                out.push(c);
            }
            ('/', Some('/')) => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        out.push('\n');
                    }
                    if prev == '*' && skipped == '/' {
                        break;
                    }
                    prev = skipped;
                }
            }
            _ => out.push(c),
        }
    }
    out
}

/// Remove commas that directly precede a closing `}` or `]` (ignoring
/// whitespace). Expects comment-free input, i.e. the output of
/// [`strip_jsonc`].
#[must_use]
pub fn strip_trailing_commas(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_str = false;
    let mut escaped = false;
    let mut pending_comma: Option<usize> = None;

    for c in input.chars() {
        if in_str {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_str = false;
            }
            continue;
        }
        match c {
            ',' => {
                pending_comma = Some(out.len());
                out.push(c);
            }
            '}' | ']' => {
                if let Some(at) = pending_comma.take() {
                    out.remove(at);
                }
                out.push(c);
            }
            c if c.is_whitespace() => out.push(c),
            _ => {
                pending_comma = None;
                if c == '"' {
                    in_str = true;
                }
                out.push(c);
            }
        }
    }
    out
}

/// Convenience wrapper: [`strip_jsonc`] followed by [`strip_trailing_commas`].
#[must_use]
pub fn to_strict_json(input: &str) -> String {
    strip_trailing_commas(&strip_jsonc(input))
}

#[cfg(test)]
mod tests {
    use super::{strip_jsonc, strip_trailing_commas, to_strict_json};

    #[test]
    fn strips_line_and_block_comments() {
        let input = r#"
{
  // off until the product owner confirms
  "strict_gtin_checksum": false, /* legacy */ "locale": "tr"
}
"#;
        let stripped = strip_jsonc(input);
        assert!(!stripped.contains("product owner"));
        assert!(!stripped.contains("legacy"));
        assert!(stripped.contains("\"strict_gtin_checksum\": false"));
        assert!(stripped.contains("\"locale\": \"tr\""));
    }

    #[test]
    fn keeps_line_count() {
        let input = "{\n// a\n/* b\n c */\n\"x\": 1\n}";
        assert_eq!(strip_jsonc(input).lines().count(), input.lines().count());
    }

    #[test]
    fn preserves_comment_like_text_in_strings() {
        let input = r#"{ "url": "http://example.com/*x*/", "note":"//keep", "q": "a\"//b" }"#;
        let stripped = strip_jsonc(input);
        assert_eq!(stripped, input);
    }

    #[test]
    fn removes_trailing_commas() {
        let input = "{ \"a\": [1, 2, ], \"b\": \",]\", }";
        let fixed = strip_trailing_commas(input);
        let v: serde_json::Value = serde_json::from_str(&fixed).expect("strict JSON");
        assert_eq!(v["a"], serde_json::json!([1, 2]));
        assert_eq!(v["b"], ",]");
    }

    #[test]
    fn to_strict_json_combines_both_passes() {
        let input = "{\n  \"id\": \"line-3\", // press line\n}\n";
        let out = to_strict_json(input);
        assert!(!out.contains("press line"));
        assert!(!out.contains(','));
    }
}
