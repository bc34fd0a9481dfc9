//! HTTP handlers. Each returns a status and a JSON body; errors use
//! `{ "error": ..., "details": [...] }`.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use super::state::AppState;
use crate::error::RouteError;
use crate::routes::{RoutePipeline, RouteSpec};

type Reply = (StatusCode, Json<Value>);

/// Body of `POST /api/extract`
#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    /// Raw model output to run through the extractor
    pub text: String,
    /// Route whose output schema and fallback apply
    pub route: String,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Reply {
    let model = state.provider.metadata();
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "provider": model.provider,
            "model": model.id,
            "base_url": state.config.provider.base_url(),
            "routes": state.routes.len()
        })),
    )
}

pub async fn list_routes(State(state): State<Arc<AppState>>) -> Reply {
    let routes = state.routes.summaries();
    let count = routes.len();
    (StatusCode::OK, Json(json!({ "routes": routes, "count": count })))
}

pub async fn run_route(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Reply {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => return bad_body(rejection),
    };
    let spec = match find(&state, &name) {
        Ok(spec) => spec,
        Err(e) => return error_reply(&e),
    };

    match RoutePipeline::run(spec, state.provider.as_ref(), &body).await {
        Ok(output) => (StatusCode::OK, Json(json!(output))),
        Err(e) => error_reply(&e),
    }
}

pub async fn extract(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ExtractRequest>, JsonRejection>,
) -> Reply {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return bad_body(rejection),
    };
    let result = find(&state, &request.route)
        .and_then(|spec| RoutePipeline::extract_only(spec, &request.text));

    match result {
        Ok(output) => (StatusCode::OK, Json(json!(output))),
        Err(e) => error_reply(&e),
    }
}

fn find<'a>(state: &'a AppState, name: &str) -> Result<&'a RouteSpec, RouteError> {
    state
        .routes
        .get(name)
        .ok_or_else(|| RouteError::UnknownRoute(name.to_string()))
}

fn error_reply(err: &RouteError) -> Reply {
    let mut body = json!({ "error": err.to_string() });
    let details = err.details();
    if !details.is_empty() {
        body["details"] = json!(details);
    }
    if let RouteError::Unprocessable { raw_excerpt, .. } = err {
        body["raw_excerpt"] = json!(raw_excerpt);
    }
    (err.status(), Json(body))
}

fn bad_body(rejection: JsonRejection) -> Reply {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "Invalid request body", "details": [rejection.body_text()] })),
    )
}
