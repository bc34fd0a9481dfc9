//! Declarative response shapes and the validator that checks them.
//!
//! Every route declares a [`SchemaDescriptor`] once; validation collects all
//! violations instead of stopping at the first so callers can report
//! everything wrong with a response together.

use serde_json::{Map, Value};
use thiserror::Error;

/// A structured value produced by a successful parse.
pub type ParsedResult = Value;

/// Primitive kind a field must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    /// Any JSON value, including null
    Any,
}

impl FieldKind {
    /// Name used in violation messages
    pub fn name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
            Self::Any => "any",
        }
    }

    fn matches(&self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Integer => {
                value.is_i64()
                    || value.is_u64()
                    || value.as_f64().is_some_and(|f| f.fract() == 0.0)
            }
            Self::Boolean => value.is_boolean(),
            Self::Array => value.is_array(),
            Self::Object => value.is_object(),
            Self::Any => true,
        }
    }
}

/// A single reason a value failed extraction or validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Violation {
    #[error("no JSON object found")]
    NoJson,

    #[error("malformed JSON: {0}")]
    Malformed(String),

    #[error("expected a JSON object")]
    NotAnObject,

    #[error("missing field {0}")]
    MissingField(String),

    #[error("{path} must be {expected}")]
    WrongKind { path: String, expected: &'static str },

    #[error("{path} must be one of {}", .allowed.join(","))]
    NotAllowed { path: String, allowed: Vec<String> },

    #[error("{path} out of range [{min},{max}]")]
    OutOfRange { path: String, min: f64, max: f64 },

    #[error("{path} must have length in [{min},{max}]")]
    BadLength { path: String, min: usize, max: usize },

    #[error("unknown field {0}")]
    UnknownField(String),
}

impl Violation {
    /// True for failures to find or parse JSON at all, as opposed to a
    /// parsed value with the wrong shape.
    pub fn is_malformed_input(&self) -> bool {
        matches!(self, Self::NoJson | Self::Malformed(_))
    }
}

/// Result of validating a parsed value against a descriptor.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    Valid(ParsedResult),
    Invalid(Vec<Violation>),
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// Violations, empty when valid
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::Valid(_) => &[],
            Self::Invalid(errors) => errors,
        }
    }

    /// Violation messages, for API responses and logs
    pub fn messages(&self) -> Vec<String> {
        self.violations().iter().map(|v| v.to_string()).collect()
    }

    pub fn into_result(self) -> Result<ParsedResult, Vec<Violation>> {
        match self {
            Self::Valid(value) => Ok(value),
            Self::Invalid(errors) => Err(errors),
        }
    }
}

/// Expected shape of one field (or of the items of an array field).
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
    /// Legal values for string fields
    pub allowed: Option<Vec<String>>,
    pub ignore_case: bool,
    /// Inclusive numeric bounds
    pub range: Option<(f64, f64)>,
    /// Inclusive length bounds: characters for strings, items for arrays
    pub length: Option<(usize, usize)>,
    /// Shape of each item of an array field
    pub items: Option<Box<FieldSpec>>,
    /// Shape of an object field
    pub fields: Option<SchemaDescriptor>,
}

impl FieldSpec {
    fn new(name: impl Into<String>, kind: FieldKind, required: bool) -> Self {
        Self {
            name: name.into(),
            kind,
            required,
            allowed: None,
            ignore_case: false,
            range: None,
            length: None,
            items: None,
            fields: None,
        }
    }

    pub fn required(name: impl Into<String>, kind: FieldKind) -> Self {
        Self::new(name, kind, true)
    }

    pub fn optional(name: impl Into<String>, kind: FieldKind) -> Self {
        Self::new(name, kind, false)
    }

    /// Spec for array items; the name is unused
    pub fn item(kind: FieldKind) -> Self {
        Self::new("", kind, true)
    }

    pub fn one_of(mut self, values: &[&str]) -> Self {
        self.allowed = Some(values.iter().map(|v| v.to_string()).collect());
        self
    }

    /// Match enumerated values case-insensitively
    pub fn ignore_case(mut self) -> Self {
        self.ignore_case = true;
        self
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.range = Some((min, max));
        self
    }

    pub fn length(mut self, min: usize, max: usize) -> Self {
        self.length = Some((min, max));
        self
    }

    pub fn items(mut self, item: FieldSpec) -> Self {
        self.items = Some(Box::new(item));
        self
    }

    pub fn fields(mut self, schema: SchemaDescriptor) -> Self {
        self.fields = Some(schema);
        self
    }

    /// Whether `value` satisfies this spec in full
    pub fn accepts(&self, value: &Value) -> bool {
        let mut errors = Vec::new();
        self.check(&self.name, value, &mut errors);
        errors.is_empty()
    }

    pub(crate) fn is_allowed(&self, s: &str) -> bool {
        match &self.allowed {
            None => true,
            Some(allowed) if self.ignore_case => allowed.iter().any(|a| a.eq_ignore_ascii_case(s)),
            Some(allowed) => allowed.iter().any(|a| a == s),
        }
    }

    fn collect_contradictions(&self, path: &str, found: &mut Vec<String>) {
        if let Some((min, max)) = self.range {
            if min > max {
                found.push(format!("{path}: range [{min},{max}] is empty"));
            } else if self.kind == FieldKind::Integer && min.ceil() > max.floor() {
                found.push(format!("{path}: range [{min},{max}] holds no integer"));
            }
        }
        if let Some((min, max)) = self.length {
            if min > max {
                found.push(format!("{path}: length [{min},{max}] is empty"));
            }
        }
        if let Some(allowed) = &self.allowed {
            if allowed.is_empty() {
                found.push(format!("{path}: no allowed values"));
            } else if let Some((min, max)) = self.length {
                if !allowed.iter().any(|a| (min..=max).contains(&a.chars().count())) {
                    found.push(format!("{path}: no allowed value fits length [{min},{max}]"));
                }
            }
        }
        if let Some(item) = &self.items {
            item.collect_contradictions(&format!("{path}[]"), found);
        }
        if let Some(schema) = &self.fields {
            schema.collect_contradictions(Some(path), found);
        }
    }

    /// Rewrite case-insensitive enum matches to their declared spelling,
    /// through nested items and objects. Assumes `value` already validated.
    fn canonicalize(&self, value: &mut Value) {
        match value {
            Value::String(s) if self.ignore_case => {
                let declared = self
                    .allowed
                    .as_ref()
                    .and_then(|allowed| allowed.iter().find(|a| a.eq_ignore_ascii_case(s.as_str())));
                if let Some(declared) = declared {
                    if declared.as_str() != s.as_str() {
                        *s = declared.clone();
                    }
                }
            }
            Value::Array(items) => {
                if let Some(item) = &self.items {
                    items.iter_mut().for_each(|v| item.canonicalize(v));
                }
            }
            Value::Object(map) => {
                if let Some(schema) = &self.fields {
                    schema.canonicalize(map);
                }
            }
            _ => {}
        }
    }

    fn check(&self, path: &str, value: &Value, errors: &mut Vec<Violation>) {
        if !self.kind.matches(value) {
            errors.push(Violation::WrongKind {
                path: path.to_string(),
                expected: self.kind.name(),
            });
            return;
        }

        if let (Some(allowed), Some(s)) = (&self.allowed, value.as_str()) {
            if !self.is_allowed(s) {
                errors.push(Violation::NotAllowed {
                    path: path.to_string(),
                    allowed: allowed.clone(),
                });
            }
        }

        if let (Some((min, max)), Some(n)) = (self.range, value.as_f64()) {
            if n < min || n > max {
                errors.push(Violation::OutOfRange {
                    path: path.to_string(),
                    min,
                    max,
                });
            }
        }

        if let Some((min, max)) = self.length {
            let len = match value {
                Value::String(s) => Some(s.chars().count()),
                Value::Array(a) => Some(a.len()),
                _ => None,
            };
            if let Some(len) = len {
                if len < min || len > max {
                    errors.push(Violation::BadLength {
                        path: path.to_string(),
                        min,
                        max,
                    });
                }
            }
        }

        match value {
            Value::Array(items) => {
                if let Some(item) = &self.items {
                    for (i, v) in items.iter().enumerate() {
                        item.check(&format!("{path}[{i}]"), v, errors);
                    }
                }
            }
            Value::Object(map) => {
                if let Some(schema) = &self.fields {
                    schema.check_object(Some(path), map, errors);
                }
            }
            _ => {}
        }
    }
}

/// Declared shape of a route's request or response object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaDescriptor {
    fields: Vec<FieldSpec>,
    strict: bool,
}

impl SchemaDescriptor {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields, strict: false }
    }

    /// Reject keys the descriptor doesn't declare
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub(crate) fn field_mut(&mut self, name: &str) -> Option<&mut FieldSpec> {
        self.fields.iter_mut().find(|f| f.name == name)
    }

    /// Validate a parsed value, collecting every violation.
    ///
    /// A valid result carries enum values in their declared spelling, so a
    /// case-insensitive match on "POSITIVE" comes back as "positive".
    pub fn validate(&self, value: &Value) -> ValidationOutcome {
        self.validate_owned(value.clone())
    }

    /// Like [`validate`](Self::validate) but consumes the value.
    pub fn validate_owned(&self, mut value: Value) -> ValidationOutcome {
        let errors = self.violations(&value);
        if !errors.is_empty() {
            return ValidationOutcome::Invalid(errors);
        }
        if let Value::Object(map) = &mut value {
            self.canonicalize(map);
        }
        ValidationOutcome::Valid(value)
    }

    fn canonicalize(&self, map: &mut Map<String, Value>) {
        for field in &self.fields {
            if let Some(value) = map.get_mut(&field.name) {
                field.canonicalize(value);
            }
        }
    }

    pub fn violations(&self, value: &Value) -> Vec<Violation> {
        let mut errors = Vec::new();
        if self.fields.is_empty() && !self.strict {
            return errors;
        }
        match value.as_object() {
            Some(map) => self.check_object(None, map, &mut errors),
            None => errors.push(Violation::NotAnObject),
        }
        errors
    }

    /// Declarations no value can satisfy, such as an integer range with no
    /// integer in it. Fallback synthesis only guarantees a conforming value
    /// when this is empty.
    pub fn contradictions(&self) -> Vec<String> {
        let mut found = Vec::new();
        self.collect_contradictions(None, &mut found);
        found
    }

    fn collect_contradictions(&self, prefix: Option<&str>, found: &mut Vec<String>) {
        for field in &self.fields {
            let path = match prefix {
                Some(p) => format!("{p}.{}", field.name),
                None => field.name.clone(),
            };
            field.collect_contradictions(&path, found);
        }
    }

    /// Check that a route's declared fallback conforms to its own descriptor.
    pub fn check_fallback(&self, fallback: &Value) -> Result<(), Vec<Violation>> {
        match self.violations(fallback) {
            errors if errors.is_empty() => Ok(()),
            errors => Err(errors),
        }
    }

    fn check_object(&self, prefix: Option<&str>, map: &Map<String, Value>, errors: &mut Vec<Violation>) {
        let path_of = |name: &str| match prefix {
            Some(p) => format!("{p}.{name}"),
            None => name.to_string(),
        };

        for field in &self.fields {
            match map.get(&field.name) {
                None | Some(Value::Null) if !field.required => {}
                None => errors.push(Violation::MissingField(path_of(&field.name))),
                Some(value) => field.check(&path_of(&field.name), value, errors),
            }
        }

        if self.strict {
            for key in map.keys() {
                if self.field(key).is_none() {
                    errors.push(Violation::UnknownField(path_of(key)));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sentiment() -> SchemaDescriptor {
        SchemaDescriptor::new(vec![
            FieldSpec::required("sentiment", FieldKind::String).one_of(&["positive", "negative", "neutral"]),
            FieldSpec::required("score", FieldKind::Number).range(0.0, 1.0),
        ])
    }

    #[test]
    fn test_conforming_object_is_valid() {
        let value = json!({"sentiment": "negative", "score": 0.1, "extra": true});
        assert_eq!(sentiment().validate(&value), ValidationOutcome::Valid(value));
    }

    #[test]
    fn test_collects_all_violations() {
        let outcome = sentiment().validate(&json!({"sentiment": "great", "score": 5}));
        assert_eq!(
            outcome.messages(),
            vec![
                "sentiment must be one of positive,negative,neutral",
                "score out of range [0,1]",
            ]
        );
    }

    #[test]
    fn test_missing_and_wrong_kind() {
        let outcome = sentiment().validate(&json!({"score": "high"}));
        assert_eq!(outcome.messages(), vec!["missing field sentiment", "score must be number"]);
    }

    #[test]
    fn test_root_must_be_object() {
        let outcome = sentiment().validate(&json!([1, 2]));
        assert_eq!(outcome.violations(), &[Violation::NotAnObject]);
    }

    #[test]
    fn test_optional_null_is_absent() {
        let schema = SchemaDescriptor::new(vec![FieldSpec::optional("analysis", FieldKind::String)]);
        assert!(schema.validate(&json!({"analysis": null})).is_valid());
        assert!(schema.validate(&json!({})).is_valid());
        assert!(!schema.validate(&json!({"analysis": 3})).is_valid());
    }

    #[test]
    fn test_case_insensitive_enum() {
        let schema = SchemaDescriptor::new(vec![FieldSpec::required("sentiment", FieldKind::String)
            .one_of(&["positive", "negative"])
            .ignore_case()]);
        assert_eq!(
            schema.validate(&json!({"sentiment": "Positive"})),
            ValidationOutcome::Valid(json!({"sentiment": "positive"}))
        );
        assert!(!sentiment().validate(&json!({"sentiment": "Positive", "score": 0.5})).is_valid());
    }

    #[test]
    fn test_case_insensitive_enum_canonical_in_nested_items() {
        let entity = SchemaDescriptor::new(vec![FieldSpec::required("type", FieldKind::String)
            .one_of(&["person", "location"])
            .ignore_case()]);
        let schema = SchemaDescriptor::new(vec![FieldSpec::required("entities", FieldKind::Array)
            .items(FieldSpec::item(FieldKind::Object).fields(entity))]);
        let outcome = schema.validate_owned(json!({"entities": [{"type": "LOCATION"}, {"type": "person"}]}));
        assert_eq!(
            outcome,
            ValidationOutcome::Valid(json!({"entities": [{"type": "location"}, {"type": "person"}]}))
        );
    }

    #[test]
    fn test_contradictions() {
        assert!(sentiment().contradictions().is_empty());

        let schema = SchemaDescriptor::new(vec![
            FieldSpec::required("n", FieldKind::Integer).range(0.5, 0.9),
            FieldSpec::required("x", FieldKind::Number).range(2.0, 1.0),
            FieldSpec::required("tags", FieldKind::Array)
                .items(FieldSpec::item(FieldKind::String).one_of(&["ab"]).length(3, 5)),
        ]);
        assert_eq!(
            schema.contradictions(),
            vec![
                "n: range [0.5,0.9] holds no integer",
                "x: range [2,1] is empty",
                "tags[]: no allowed value fits length [3,5]",
            ]
        );
        assert!(SchemaDescriptor::new(vec![FieldSpec::required("n", FieldKind::Integer).range(0.5, 1.5)])
            .contradictions()
            .is_empty());
    }

    #[test]
    fn test_integer_kind() {
        let schema = SchemaDescriptor::new(vec![FieldSpec::required("day", FieldKind::Integer)]);
        assert!(schema.validate(&json!({"day": 3})).is_valid());
        assert!(schema.validate(&json!({"day": 3.0})).is_valid());
        assert_eq!(schema.validate(&json!({"day": 3.5})).messages(), vec!["day must be integer"]);
    }

    #[test]
    fn test_nested_paths() {
        let entity = SchemaDescriptor::new(vec![
            FieldSpec::required("text", FieldKind::String),
            FieldSpec::required("type", FieldKind::String).one_of(&["person", "location"]),
        ]);
        let schema = SchemaDescriptor::new(vec![FieldSpec::required("entities", FieldKind::Array)
            .items(FieldSpec::item(FieldKind::Object).fields(entity))]);

        let outcome = schema.validate(&json!({
            "entities": [
                {"text": "Ada", "type": "person"},
                {"text": "Mars", "type": "planet"},
                {"type": "location"},
                "oops"
            ]
        }));
        assert_eq!(
            outcome.messages(),
            vec![
                "entities[1].type must be one of person,location",
                "missing field entities[2].text",
                "entities[3] must be object",
            ]
        );
    }

    #[test]
    fn test_length_bounds() {
        let schema = SchemaDescriptor::new(vec![
            FieldSpec::required("text", FieldKind::String).length(1, 5),
            FieldSpec::required("build", FieldKind::Array).length(2, 2),
        ]);
        assert!(schema.validate(&json!({"text": "héllo", "build": [1, 2]})).is_valid());
        assert_eq!(
            schema.validate(&json!({"text": "", "build": [1]})).messages(),
            vec!["text must have length in [1,5]", "build must have length in [2,2]"]
        );
    }

    #[test]
    fn test_strict_rejects_unknown_fields() {
        let schema = sentiment().strict();
        let outcome = schema.validate(&json!({"sentiment": "neutral", "score": 0, "why": "x"}));
        assert_eq!(outcome.messages(), vec!["unknown field why"]);
    }

    #[test]
    fn test_check_fallback() {
        assert!(sentiment().check_fallback(&json!({"sentiment": "neutral", "score": 0})).is_ok());
        assert!(sentiment().check_fallback(&json!({"sentiment": "meh"})).is_err());
    }
}
