//! Prompt templates with `{{name}}` placeholders.

use serde_json::{Map, Value};

/// A prompt with `{{field}}` or `{{field|default}}` placeholders filled from
/// a validated request body.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptTemplate {
    source: String,
}

impl PromptTemplate {
    pub fn new(source: impl Into<String>) -> Self {
        Self { source: source.into() }
    }

    /// Render against `vars`. Unknown or null variables fall back to the
    /// placeholder's default, or to an empty string.
    pub fn render(&self, vars: &Map<String, Value>) -> String {
        let mut out = String::with_capacity(self.source.len());
        let mut rest = self.source.as_str();

        while let Some(open) = rest.find("{{") {
            out.push_str(&rest[..open]);
            let after = &rest[open + 2..];
            let Some(close) = after.find("}}") else {
                out.push_str(&rest[open..]);
                return out;
            };

            let (name, default) = match after[..close].split_once('|') {
                Some((name, default)) => (name.trim(), default.trim()),
                None => (after[..close].trim(), ""),
            };
            match vars.get(name).and_then(display_value) {
                Some(value) => out.push_str(&value),
                None => out.push_str(default),
            }
            rest = &after[close + 2..];
        }

        out.push_str(rest);
        out
    }

    /// Placeholder names in order of appearance
    pub fn variables(&self) -> Vec<&str> {
        let mut names = Vec::new();
        let mut rest = self.source.as_str();
        while let Some(open) = rest.find("{{") {
            let after = &rest[open + 2..];
            let Some(close) = after.find("}}") else { break };
            let inner = &after[..close];
            names.push(inner.split_once('|').map(|(n, _)| n).unwrap_or(inner).trim());
            rest = &after[close + 2..];
        }
        names
    }
}

/// How a request value reads inside a prompt.
fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(items) if items.is_empty() => None,
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(display_value)
                .collect::<Vec<_>>()
                .join(", "),
        ),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vars(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_render_values() {
        let template = PromptTemplate::new("Plan {{days}} days. Avoid: {{avoid|None}}. Snacks: {{snacks}}. Likes: {{likes}}");
        let out = template.render(&vars(json!({
            "days": 3,
            "snacks": false,
            "likes": ["thai", "mexican"]
        })));
        assert_eq!(out, "Plan 3 days. Avoid: None. Snacks: false. Likes: thai, mexican");
    }

    #[test]
    fn test_strings_are_inserted_raw() {
        let template = PromptTemplate::new("Text: \"{{ text }}\"");
        assert_eq!(template.render(&vars(json!({"text": "it's \"fine\""}))), "Text: \"it's \"fine\"\"");
    }

    #[test]
    fn test_missing_and_empty_values() {
        let template = PromptTemplate::new("[{{a}}][{{b|any}}][{{c|none}}]");
        assert_eq!(template.render(&vars(json!({"b": null, "c": []}))), "[][any][none]");
    }

    #[test]
    fn test_unclosed_placeholder_kept() {
        let template = PromptTemplate::new("JSON like {\"a\": 1} and {{oops");
        assert_eq!(template.render(&Map::new()), "JSON like {\"a\": 1} and {{oops");
    }

    #[test]
    fn test_variables() {
        let template = PromptTemplate::new("{{text}} in {{ max_words | 100 }} words");
        assert_eq!(template.variables(), vec!["text", "max_words"]);
    }
}
