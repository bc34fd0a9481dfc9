//! Tolerant structured-response extraction.
//!
//! Turns free-form model output into a validated JSON value:
//!
//! raw text → [`normalize`] → [`balance`] → parse (→ [`repair`] → parse)
//! → [`SchemaDescriptor::validate`] → [`ValidationOutcome`]
//!
//! Nothing here does I/O or panics; every path returns a value, so the
//! extractor can be shared across request tasks without locking.

pub mod balance;
pub mod fallback;
pub mod normalize;
pub mod repair;
pub mod schema;

pub use balance::balance;
pub use fallback::synthesize;
pub use normalize::normalize;
pub use repair::repair;
pub use schema::{FieldKind, FieldSpec, ParsedResult, SchemaDescriptor, ValidationOutcome, Violation};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What a route does when a model response fails extraction or validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
    /// Answer with the route's synthesized fallback
    Degrade,
    /// Report the violations to the caller
    Surface,
}

impl FallbackPolicy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Degrade => "degrade",
            Self::Surface => "surface",
        }
    }
}

/// Parse the JSON value buried in a raw model response.
pub fn parse_candidate(raw: &str) -> Result<ParsedResult, Violation> {
    let normalized = normalize(raw);
    if !normalized.starts_with(|c| c == '{' || c == '[') {
        return Err(Violation::NoJson);
    }

    match serde_json::from_str(&balance(&normalized)) {
        Ok(value) => Ok(value),
        Err(first) => serde_json::from_str(&balance(&repair(&normalized)))
            .map_err(|_| Violation::Malformed(first.to_string())),
    }
}

/// Extract and validate a raw model response against `schema`.
pub fn extract(raw: &str, schema: &SchemaDescriptor) -> ValidationOutcome {
    match parse_candidate(raw) {
        Ok(value) => schema.validate_owned(value),
        Err(violation) => ValidationOutcome::Invalid(vec![violation]),
    }
}

/// Outcome of one extraction, plus the fallback when the policy degrades.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub outcome: ValidationOutcome,
    pub fallback: Option<ParsedResult>,
}

impl Extraction {
    /// The value to hand back to the caller, if any.
    pub fn result(&self) -> Option<&ParsedResult> {
        match &self.outcome {
            ValidationOutcome::Valid(value) => Some(value),
            ValidationOutcome::Invalid(_) => self.fallback.as_ref(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        !self.outcome.is_valid() && self.fallback.is_some()
    }
}

/// A route's descriptor, fallback and policy bundled for repeated use.
#[derive(Debug, Clone)]
pub struct Extractor {
    schema: SchemaDescriptor,
    fallback: ParsedResult,
    policy: FallbackPolicy,
}

impl Extractor {
    /// The fallback template is synthesized once against the schema, so the
    /// stored fallback always conforms.
    pub fn new(schema: SchemaDescriptor, fallback: &Value, policy: FallbackPolicy) -> Self {
        let fallback = synthesize(&schema, fallback);
        Self { schema, fallback, policy }
    }

    pub fn schema(&self) -> &SchemaDescriptor {
        &self.schema
    }

    pub fn fallback(&self) -> &ParsedResult {
        &self.fallback
    }

    pub fn policy(&self) -> FallbackPolicy {
        self.policy
    }

    /// Extract from raw model text.
    pub fn run(&self, raw: &str) -> Extraction {
        self.finish(extract(raw, &self.schema))
    }

    /// Validate a value that was already parsed (e.g. wrapped plain text).
    pub fn run_value(&self, value: Value) -> Extraction {
        self.finish(self.schema.validate_owned(value))
    }

    fn finish(&self, outcome: ValidationOutcome) -> Extraction {
        let fallback = match (&outcome, self.policy) {
            (ValidationOutcome::Invalid(_), FallbackPolicy::Degrade) => Some(self.fallback.clone()),
            _ => None,
        };
        Extraction { outcome, fallback }
    }
}
