//! Errors a route invocation can end in.

use axum::http::StatusCode;
use thiserror::Error;

use crate::extract::Violation;

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("Unknown route: {0}")]
    UnknownRoute(String),

    #[error("Invalid input")]
    InvalidInput(Vec<Violation>),

    #[error("Provider request failed: {0}")]
    Provider(String),

    #[error("Model response failed validation")]
    Unprocessable {
        violations: Vec<Violation>,
        /// Start of the raw model text, for debugging
        raw_excerpt: String,
    },
}

impl RouteError {
    /// HTTP status the server answers with
    pub fn status(&self) -> StatusCode {
        match self {
            Self::UnknownRoute(_) => StatusCode::NOT_FOUND,
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::Provider(_) => StatusCode::BAD_GATEWAY,
            Self::Unprocessable { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    /// Field-level messages, empty for errors without any
    pub fn details(&self) -> Vec<String> {
        match self {
            Self::InvalidInput(violations) | Self::Unprocessable { violations, .. } => {
                violations.iter().map(|v| v.to_string()).collect()
            }
            _ => Vec::new(),
        }
    }

    pub(crate) fn unprocessable(violations: Vec<Violation>, raw: &str) -> Self {
        const EXCERPT_CHARS: usize = 200;
        let mut raw_excerpt: String = raw.chars().take(EXCERPT_CHARS).collect();
        if raw.chars().count() > EXCERPT_CHARS {
            raw_excerpt.push_str("...");
        }
        Self::Unprocessable { violations, raw_excerpt }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(RouteError::UnknownRoute("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(RouteError::Provider("down".into()).status(), StatusCode::BAD_GATEWAY);
        assert_eq!(RouteError::InvalidInput(vec![]).status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unprocessable_excerpt() {
        let raw = "x".repeat(250);
        let err = RouteError::unprocessable(vec![Violation::NoJson], &raw);
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.details(), vec!["no JSON object found"]);
        match err {
            RouteError::Unprocessable { raw_excerpt, .. } => assert_eq!(raw_excerpt.len(), 203),
            other => panic!("unexpected {other:?}"),
        }
    }
}
