//! The one prompt → provider → extract flow every route goes through.

use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::spec::{ResponseFormat, RouteSpec};
use crate::error::RouteError;
use crate::extract::{Extraction, ParsedResult};
use crate::llm::{LLMProvider, Usage};

/// Successful route answer, possibly degraded to the route's fallback.
#[derive(Debug, Clone, Serialize)]
pub struct RouteOutput {
    pub request_id: String,
    pub route: String,
    pub result: ParsedResult,
    /// True when `result` is the fallback rather than the model's answer
    pub degraded: bool,
    /// Violations that caused the degradation
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
    /// RFC 3339 completion time
    pub timestamp: String,
}

pub struct RoutePipeline;

impl RoutePipeline {
    /// Run `spec` against `provider` for one request body.
    pub async fn run(
        spec: &RouteSpec,
        provider: &dyn LLMProvider,
        body: &Value,
    ) -> Result<RouteOutput, RouteError> {
        let request_id = Uuid::new_v4().to_string();
        let vars = spec.validate_input(body)?;
        let messages = spec.messages(&vars);
        let model = provider.metadata();

        info!(route = %spec.name, request_id = %request_id, provider = %model.provider, "Calling model");
        let response = provider
            .completion(&messages, &spec.options)
            .await
            .map_err(|e| RouteError::Provider(format!("{e:#}")))?;
        debug!(route = %spec.name, chars = response.content.len(), "Model responded");

        let extractor = spec.extractor_for(&vars);
        let extraction = match &spec.response {
            ResponseFormat::Json => extractor.run(&response.content),
            ResponseFormat::Text { field } => extractor.run_value(wrap_text(field, &response.content)),
        };

        let mut output = Self::finish(spec, extraction, &response.content, request_id)?;
        output.model = Some(model.id);
        output.usage = Some(response.usage);
        Ok(output)
    }

    /// Run only the extraction half on text a model already produced.
    pub fn extract_only(spec: &RouteSpec, raw: &str) -> Result<RouteOutput, RouteError> {
        let extraction = match &spec.response {
            ResponseFormat::Json => spec.extractor().run(raw),
            ResponseFormat::Text { field } => spec.extractor().run_value(wrap_text(field, raw)),
        };
        Self::finish(spec, extraction, raw, Uuid::new_v4().to_string())
    }

    fn finish(
        spec: &RouteSpec,
        extraction: Extraction,
        raw: &str,
        request_id: String,
    ) -> Result<RouteOutput, RouteError> {
        let errors = extraction.outcome.messages();
        let degraded = extraction.is_degraded();
        let malformed = extraction.outcome.violations().iter().any(|v| v.is_malformed_input());

        let result = match (extraction.outcome.into_result(), extraction.fallback) {
            (Ok(value), _) => value,
            (Err(violations), fallback) => {
                if malformed {
                    warn!(route = %spec.name, errors = ?errors, degraded, "No usable JSON in model response");
                } else {
                    warn!(route = %spec.name, errors = ?errors, degraded, "Model response failed schema validation");
                }
                match fallback {
                    Some(fallback) => fallback,
                    None => return Err(RouteError::unprocessable(violations, raw)),
                }
            }
        };

        Ok(RouteOutput {
            request_id,
            route: spec.name.clone(),
            result,
            degraded,
            errors,
            model: None,
            usage: None,
            timestamp: Utc::now().to_rfc3339(),
        })
    }
}

/// Plain-text completions become `{field: text}`; blank text becomes `{}` so
/// the missing field is reported.
fn wrap_text(field: &str, text: &str) -> Value {
    let mut map = Map::new();
    let text = text.trim();
    if !text.is_empty() {
        map.insert(field.to_string(), Value::String(text.to_string()));
    }
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::catalog;
    use serde_json::json;

    #[test]
    fn test_extract_only_valid() {
        let out = RoutePipeline::extract_only(
            &catalog::sentiment(),
            "```json\n{\"sentiment\": \"POSITIVE\", \"score\": 0.9, \"confidence\": 0.8}\n```",
        )
        .unwrap();
        assert!(!out.degraded);
        assert!(out.errors.is_empty());
        assert_eq!(out.result["sentiment"], "positive");
    }

    #[test]
    fn test_extract_only_degrades() {
        let out = RoutePipeline::extract_only(&catalog::sentiment(), "I cannot analyze this.").unwrap();
        assert!(out.degraded);
        assert_eq!(out.errors, vec!["no JSON object found"]);
        assert_eq!(out.result["sentiment"], "neutral");
    }

    #[test]
    fn test_extract_only_surfaces() {
        let err = RoutePipeline::extract_only(&catalog::build_advice(), "{\"recommended_build\": [\"Boots\"]")
            .unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::UNPROCESSABLE_ENTITY);
        assert!(err.details().contains(&"missing field build_process".to_string()));
    }

    #[test]
    fn test_text_route_wraps_completion() {
        let spec = catalog::summarize();
        let out = RoutePipeline::extract_only(&spec, "  A short summary.\n").unwrap();
        assert_eq!(out.result, json!({"summary": "A short summary."}));

        let err = RoutePipeline::extract_only(&spec, "   ").unwrap_err();
        assert_eq!(err.details(), vec!["missing field summary"]);
    }
}
