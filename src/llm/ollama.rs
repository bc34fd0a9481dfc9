//! Ollama Provider.
//!
//! Talks to a local (or LAN) Ollama daemon through its native
//! `/api/chat` endpoint with streaming disabled.

use super::openai::ApiMessage;
use super::provider::{LLMProvider, ModelMetadata};
use super::types::{CompletionOptions, CompletionResponse, Message, Usage};
use crate::config::ProviderConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub struct OllamaProvider {
    client: Client,
    endpoint: String,
    model: String,
}

impl OllamaProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoint: format!("{}/api/chat", config.base_url()),
            model: config.model.clone(),
        })
    }

    fn request_body(&self, messages: &[Message], options: &CompletionOptions) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: messages.iter().map(ApiMessage::from).collect(),
            stream: false,
            format: options.json_mode.then(|| "json".to_string()),
            options: GenerateOptions {
                temperature: options.temperature,
                num_predict: options.max_tokens,
            },
        }
    }
}

#[async_trait]
impl LLMProvider for OllamaProvider {
    fn metadata(&self) -> ModelMetadata {
        ModelMetadata {
            provider: "ollama".to_string(),
            id: self.model.clone(),
        }
    }

    async fn completion(&self, messages: &[Message], options: &CompletionOptions) -> Result<CompletionResponse> {
        let request = self.request_body(messages, options);

        tracing::debug!(model = %self.model, endpoint = %self.endpoint, "sending ollama chat");
        let response = self.client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .context("Failed to reach Ollama; is the daemon running?")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::warn!(%status, "ollama returned an error");
            return Err(anyhow::anyhow!("Ollama API error ({}): {}", status, error_text));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .context("Failed to parse Ollama response")?;

        Ok(CompletionResponse {
            content: chat_response.message.content,
            usage: Usage::new(
                chat_response.prompt_eval_count.unwrap_or(0),
                chat_response.eval_count.unwrap_or(0),
            ),
        })
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ApiMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<String>,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
    prompt_eval_count: Option<usize>,
    eval_count: Option<usize>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: String,
}
