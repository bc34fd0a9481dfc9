//! Brace balancing for truncated JSON.
//!
//! Models that hit their token limit stop mid-document. Appending the
//! missing closers recovers most of these responses. This is a heuristic:
//! it restores structure, not meaning, and deeply malformed input can still
//! come out as valid JSON with the wrong shape.

/// Append the closing delimiters a truncated JSON candidate is missing.
///
/// Closers are emitted innermost first, so `{"a": [1, {"b": 2` becomes
/// `{"a": [1, {"b": 2}]}`. An unterminated string is closed first, and a
/// dangling `,`, `:` or object key left by the cut is cleaned up so the
/// result parses.
/// Stray closers that match nothing are left for the parser to reject.
pub fn balance(candidate: &str) -> String {
    let mut open: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;
    // last significant char outside strings, and the one before the latest string
    let mut last_token: Option<char> = None;
    let mut before_string: Option<char> = None;

    for c in candidate.chars() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        if c.is_whitespace() {
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                before_string = last_token;
            }
            '{' => open.push('}'),
            '[' => open.push(']'),
            '}' | ']' => {
                if open.last() == Some(&c) {
                    open.pop();
                }
            }
            _ => {}
        }
        last_token = Some(c);
    }

    if open.is_empty() && !in_string {
        return candidate.to_string();
    }

    // a string right after `{` or `,` inside an object is a key left without a value
    let dangling_key = open.last() == Some(&'}')
        && last_token == Some('"')
        && matches!(before_string, Some('{') | Some(','));

    let mut out = candidate.to_string();
    if in_string {
        if escaped {
            // drop the lone backslash so the closing quote isn't escaped
            out.pop();
        }
        out.push('"');
    } else {
        close_dangling_token(&mut out);
    }
    if dangling_key {
        out.push_str(": null");
    }

    out.extend(open.iter().rev());
    out
}

/// Tidy the end of a document that was cut between tokens.
fn close_dangling_token(out: &mut String) {
    let trimmed_len = out.trim_end().len();
    out.truncate(trimmed_len);
    match out.chars().last() {
        Some(',') => {
            out.pop();
        }
        Some(':') => out.push_str(" null"),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn parses(s: &str) -> bool {
        serde_json::from_str::<Value>(s).is_ok()
    }

    #[test]
    fn test_balanced_input_unchanged() {
        let s = r#"{"a": [1, 2], "b": {"c": "}"}}"#;
        assert_eq!(balance(s), s);
    }

    #[test]
    fn test_appends_missing_braces() {
        assert_eq!(balance(r#"{"sentiment": "great", "score": 5"#), r#"{"sentiment": "great", "score": 5}"#);
        assert_eq!(balance(r#"{"a": {"b": 1"#), r#"{"a": {"b": 1}}"#);
    }

    #[test]
    fn test_closes_in_nesting_order() {
        let out = balance(r#"{"a": [1, {"b": 2"#);
        assert_eq!(out, r#"{"a": [1, {"b": 2}]}"#);
        assert!(parses(&out));
    }

    #[test]
    fn test_ignores_delimiters_in_strings() {
        let out = balance(r#"{"text": "a { [ \" b""#);
        assert_eq!(out, r#"{"text": "a { [ \" b"}"#);
    }

    #[test]
    fn test_closes_unterminated_string() {
        let out = balance(r#"{"summary": "the market ros"#);
        assert_eq!(out, r#"{"summary": "the market ros"}"#);
        assert!(parses(&out));
    }

    #[test]
    fn test_cleans_dangling_comma_and_colon() {
        assert!(parses(&balance(r#"{"a": 1, "#)));
        assert!(parses(&balance(r#"{"a": [1, 2,"#)));
        let out = balance(r#"{"a": 1, "b":"#);
        assert_eq!(out, r#"{"a": 1, "b": null}"#);
    }

    #[test]
    fn test_dangling_key_gets_null_value() {
        assert_eq!(balance(r#"{"a": 1, "b""#), r#"{"a": 1, "b": null}"#);
        assert_eq!(balance(r#"{"a": 1, "be"#), r#"{"a": 1, "be": null}"#);
        assert_eq!(balance(r#"{"a": {"b""#), r#"{"a": {"b": null}}"#);
        // strings in arrays and values are not keys
        assert_eq!(balance(r#"["x", "y""#), r#"["x", "y"]"#);
        assert_eq!(balance(r#"{"a": "b""#), r#"{"a": "b"}"#);
    }

    #[test]
    fn test_n_missing_closers_always_parse() {
        let doc = r#"{"a": {"b": [1, {"c": [true, {"d": null}]}]}}"#;
        let closers = doc.chars().rev().take_while(|c| *c == '}' || *c == ']').count();
        for n in 0..=closers {
            let truncated = &doc[..doc.len() - n];
            let out = balance(truncated);
            assert!(parses(&out), "n={n}: {out}");
            assert_eq!(out, doc);
        }
    }
}
