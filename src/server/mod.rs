//! HTTP server
//!
//! Endpoints (all under `/api`):
//!   GET  /health        - provider and model in use
//!   GET  /routes        - list routes
//!   POST /routes/:name  - run a route
//!   POST /extract       - run the extractor on supplied text, no model call

pub mod handlers;
pub mod state;

pub use state::AppState;

use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use colored::Colorize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::config::Config;
use crate::llm::build_provider;
use crate::routes::RouteRegistry;

const BODY_LIMIT: usize = 1024 * 1024;

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/health", get(handlers::health))
        .route("/routes", get(handlers::list_routes))
        .route("/routes/:name", post(handlers::run_route))
        .route("/extract", post(handlers::extract))
        .with_state(state);

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .nest("/api", api)
        .layer(CorsLayer::permissive())
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
}

/// Build the configured provider and serve until the process exits.
pub async fn run_server(config: Config) -> Result<()> {
    let provider = build_provider(&config.provider)?;
    let routes = RouteRegistry::builtin();
    routes.validate()?;
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let port = config.server.port;
    let model = provider.metadata();

    let state = Arc::new(AppState::new(provider, routes, config));
    let route_names: Vec<String> = state.routes.iter().map(|r| r.name.clone()).collect();
    let app = router(state);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) if e.kind() == std::io::ErrorKind::AddrInUse => {
            eprintln!("\n{} Port {} is already in use.\n", "Error:".red(), port);
            eprintln!("Try a different port with:");
            eprintln!("  {}\n", "llmsieve serve --port <PORT>".cyan());
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };

    info!(%addr, provider = %model.provider, model = %model.id, "Server listening");
    println!("Server running on http://localhost:{}", port);
    println!("Provider: {} ({})", model.provider.bold(), model.id);
    println!("\nAPI Endpoints:");
    println!("  GET    /api/health              - Health check");
    println!("  GET    /api/routes              - List routes");
    println!("  POST   /api/routes/:name        - Run a route");
    println!("  POST   /api/extract             - Extract from raw text (no model call)");
    println!("\nRoutes: {}", route_names.join(", "));

    axum::serve(listener, app).await?;
    Ok(())
}
