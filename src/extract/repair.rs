//! Lexical repair for near-JSON model output.
//!
//! Smaller models often answer with Python-flavoured literals or sloppy
//! commas. Only applied after a strict parse has already failed.

/// Rewrite common non-JSON idioms outside of string literals:
/// single-quoted strings, trailing commas before `}`/`]`, and the bare words
/// `True`, `False` and `None`.
pub fn repair(candidate: &str) -> String {
    let chars: Vec<char> = candidate.chars().collect();
    let mut out = String::with_capacity(candidate.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '"' => {
                let (end, _) = string_end(&chars, i, '"');
                out.extend(&chars[i..end]);
                i = end;
            }
            '\'' => {
                let (end, closed) = string_end(&chars, i, '\'');
                let body_end = if closed { end - 1 } else { end };
                push_requoted(&mut out, &chars[i + 1..body_end]);
                i = end;
            }
            ',' if closes_after(&chars, i + 1) => {
                i += 1;
            }
            c if c.is_ascii_alphabetic() => {
                let start = i;
                while i < chars.len() && chars[i].is_ascii_alphanumeric() {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                out.push_str(match word.as_str() {
                    "True" => "true",
                    "False" => "false",
                    "None" => "null",
                    _ => word.as_str(),
                });
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }
    out
}

/// Index one past the closing quote of the literal opened at `start`, and
/// whether it closed at all (truncated output may end inside a string).
fn string_end(chars: &[char], start: usize, quote: char) -> (usize, bool) {
    let mut escaped = false;
    for (offset, &c) in chars[start + 1..].iter().enumerate() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            return (start + offset + 2, true);
        }
    }
    (chars.len(), false)
}

/// Emit the body of a single-quoted literal as a double-quoted one.
fn push_requoted(out: &mut String, body: &[char]) {
    out.push('"');
    let mut escaped = false;
    for &c in body {
        if escaped {
            if c != '\'' {
                out.push('\\');
            }
            out.push(c);
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '"' {
            out.push_str("\\\"");
        } else {
            out.push(c);
        }
    }
    out.push('"');
}

fn closes_after(chars: &[char], from: usize) -> bool {
    chars[from.min(chars.len())..]
        .iter()
        .find(|c| !c.is_whitespace())
        .is_some_and(|c| *c == '}' || *c == ']')
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn parse(s: &str) -> Value {
        serde_json::from_str(&repair(s)).unwrap()
    }

    #[test]
    fn test_trailing_commas_removed() {
        assert_eq!(parse(r#"{"a": [1, 2, ], "b": 3,}"#), json!({"a": [1, 2], "b": 3}));
    }

    #[test]
    fn test_python_literals() {
        assert_eq!(
            parse(r#"{"ok": True, "bad": False, "why": None}"#),
            json!({"ok": true, "bad": false, "why": null})
        );
    }

    #[test]
    fn test_single_quotes() {
        assert_eq!(
            parse(r#"{'name': 'Caesar "salad"', 'it\'s': 1}"#),
            json!({"name": "Caesar \"salad\"", "it's": 1})
        );
    }

    #[test]
    fn test_string_contents_untouched() {
        let s = r#"{"note": "True, None, and 'quotes', ]"}"#;
        assert_eq!(repair(s), s);
    }
}
