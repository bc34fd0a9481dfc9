//! The Provider Abstraction.
//!
//! Every backend a route can call, hosted (OpenAI, Groq, OpenRouter,
//! Hugging Face) or local (Ollama), sits behind this trait so the route
//! pipeline never sees a vendor API.

use anyhow::Result;
use async_trait::async_trait;
use super::types::{CompletionOptions, CompletionResponse, Message};

/// Identifies the backend answering a request.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelMetadata {
    /// Provider name, e.g. "groq"
    pub provider: String,
    /// Model identifier as sent to the provider
    pub id: String,
}

/// The core trait for LLM interactions.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Get the provider and model this instance talks to.
    fn metadata(&self) -> ModelMetadata;

    /// Send a chat completion request.
    async fn completion(&self, messages: &[Message], options: &CompletionOptions) -> Result<CompletionResponse>;
}
