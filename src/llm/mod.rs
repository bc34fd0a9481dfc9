//! LLM Layer
//!
//! This module handles all interactions with Large Language Models:
//! - Provider abstractions (OpenAI-compatible hosts, Ollama)
//! - Universal message and completion types
//! - Building the configured provider

pub mod types;
pub mod provider;
pub mod openai;
pub mod ollama;

// Re-export key types
pub use types::{CompletionOptions, CompletionResponse, Message, Role, Usage};
pub use provider::{LLMProvider, ModelMetadata};
pub use openai::OpenAICompatProvider;
pub use ollama::OllamaProvider;

use crate::config::{ProviderConfig, ProviderKind};
use anyhow::{Context, Result};
use std::sync::Arc;

/// Build the provider described by `config`.
///
/// API keys are resolved here, not at startup, so a misconfigured hosted
/// provider surfaces as an error from this call only.
pub fn build_provider(config: &ProviderConfig) -> Result<Arc<dyn LLMProvider>> {
    match config.kind {
        ProviderKind::Ollama => Ok(Arc::new(OllamaProvider::new(config)?)),
        _ => {
            let api_key = config
                .api_key()?
                .with_context(|| format!("{} requires an API key", config.kind.name()))?;
            Ok(Arc::new(OpenAICompatProvider::new(config, api_key)?))
        }
    }
}
