//! llmsieve - LLM route server with tolerant structured-response extraction
//!
//! Features:
//! - Extractor that turns messy model output into schema-checked JSON
//! - Per-route fallbacks or surfaced errors, chosen explicitly
//! - Providers: Ollama, OpenAI, Groq, OpenRouter, Hugging Face
//! - HTTP API and CLI

pub mod config;
pub mod error;
pub mod extract;
pub mod llm;
pub mod routes;
pub mod server;

pub use config::{Config, ProviderConfig, ProviderKind, ServerConfig};
pub use error::RouteError;
pub use extract::{
    extract, Extraction, Extractor, FallbackPolicy, FieldKind, FieldSpec, ParsedResult,
    SchemaDescriptor, ValidationOutcome, Violation,
};
pub use llm::{build_provider, CompletionOptions, CompletionResponse, LLMProvider, Message, ModelMetadata, Role, Usage};
pub use routes::{PromptTemplate, RouteOutput, RoutePipeline, RouteRegistry, RouteSpec};
pub use server::{router, run_server, AppState};
