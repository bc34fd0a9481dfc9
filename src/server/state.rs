//! Server application state

use std::sync::Arc;

use crate::config::Config;
use crate::llm::LLMProvider;
use crate::routes::RouteRegistry;

/// Shared application state for all route handlers
pub struct AppState {
    pub provider: Arc<dyn LLMProvider>,
    pub routes: RouteRegistry,
    pub config: Config,
}

impl AppState {
    pub fn new(provider: Arc<dyn LLMProvider>, routes: RouteRegistry, config: Config) -> Self {
        Self { provider, routes, config }
    }
}
