//! OpenAI-compatible Provider.
//!
//! Implements the `LLMProvider` trait for the Chat Completions API. OpenAI,
//! Groq, OpenRouter and the Hugging Face router all speak this dialect and
//! differ only in base URL, key and a few attribution headers.

use super::provider::{LLMProvider, ModelMetadata};
use super::types::{CompletionOptions, CompletionResponse, Message, Role, Usage};
use crate::config::{ProviderConfig, ProviderKind};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// OpenAI-compatible provider configuration and state.
pub struct OpenAICompatProvider {
    client: Client,
    kind: ProviderKind,
    endpoint: String,
    api_key: String,
    model: String,
    referer: Option<String>,
    title: Option<String>,
}

impl OpenAICompatProvider {
    pub fn new(config: &ProviderConfig, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            kind: config.kind,
            endpoint: format!("{}/chat/completions", config.base_url()),
            api_key,
            model: config.model.clone(),
            referer: config.referer.clone(),
            title: config.title.clone(),
        })
    }

    fn request_body(&self, messages: &[Message], options: &CompletionOptions) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: messages.iter().map(ApiMessage::from).collect(),
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            response_format: options.json_mode.then(|| ResponseFormat {
                kind: "json_object".to_string(),
            }),
        }
    }
}

#[async_trait]
impl LLMProvider for OpenAICompatProvider {
    fn metadata(&self) -> ModelMetadata {
        ModelMetadata {
            provider: self.kind.name().to_string(),
            id: self.model.clone(),
        }
    }

    async fn completion(&self, messages: &[Message], options: &CompletionOptions) -> Result<CompletionResponse> {
        let request = self.request_body(messages, options);

        let mut builder = self.client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request);
        if self.kind == ProviderKind::OpenRouter {
            if let Some(referer) = &self.referer {
                builder = builder.header("HTTP-Referer", referer);
            }
            if let Some(title) = &self.title {
                builder = builder.header("X-Title", title);
            }
        }

        tracing::debug!(provider = self.kind.name(), model = %self.model, "sending chat completion");
        let response = builder
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", self.kind.name()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::warn!(provider = self.kind.name(), %status, "provider returned an error");
            return Err(anyhow::anyhow!("{} API error ({}): {}", self.kind.name(), status, error_text));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .with_context(|| format!("Failed to parse {} response", self.kind.name()))?;

        let choice = chat_response
            .choices
            .into_iter()
            .next()
            .with_context(|| format!("No choices returned from {}", self.kind.name()))?;

        Ok(CompletionResponse {
            content: choice.message.content.unwrap_or_default(),
            usage: chat_response.usage.map(Usage::from).unwrap_or_default(),
        })
    }
}

// -----------------------------------------------------------------------------
// Chat Completions DTOs (Data Transfer Objects)
// -----------------------------------------------------------------------------

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ApiMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Serialize)]
pub(crate) struct ApiMessage {
    role: String,
    content: String,
}

impl From<&Message> for ApiMessage {
    fn from(msg: &Message) -> Self {
        Self {
            role: match msg.role {
                Role::System => "system".to_string(),
                Role::User => "user".to_string(),
                Role::Assistant => "assistant".to_string(),
            },
            content: msg.content.clone(),
        }
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    // Some OpenAI-compatible hosts omit usage
    usage: Option<ApiUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ApiResponseMessage,
}

#[derive(Deserialize)]
struct ApiResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiUsage {
    prompt_tokens: usize,
    completion_tokens: usize,
    total_tokens: usize,
}

impl From<ApiUsage> for Usage {
    fn from(u: ApiUsage) -> Self {
        Self {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn provider(kind: ProviderKind) -> OpenAICompatProvider {
        OpenAICompatProvider::new(&ProviderConfig::for_kind(kind), "key".to_string()).unwrap()
    }

    #[test]
    fn test_endpoint_and_metadata() {
        let groq = provider(ProviderKind::Groq);
        assert_eq!(groq.endpoint, "https://api.groq.com/openai/v1/chat/completions");
        assert_eq!(groq.metadata().provider, "groq");
        assert_eq!(groq.metadata().id, "llama-3.1-8b-instant");
    }

    #[test]
    fn test_request_body_json_mode() {
        let openai = provider(ProviderKind::OpenAI);
        let messages = [Message::system("be terse"), Message::user("hi")];

        let body = serde_json::to_value(openai.request_body(&messages, &CompletionOptions::default())).unwrap();
        assert!(body.get("response_format").is_none());
        assert!(body.get("max_tokens").is_none());
        assert_eq!(body["messages"][0], json!({"role": "system", "content": "be terse"}));

        let options = CompletionOptions::default().json().with_max_tokens(200);
        let body = serde_json::to_value(openai.request_body(&messages, &options)).unwrap();
        assert_eq!(body["response_format"], json!({"type": "json_object"}));
        assert_eq!(body["max_tokens"], 200);
    }

    #[test]
    fn test_response_parsing_without_usage() {
        let parsed: ChatResponse = serde_json::from_value(json!({
            "choices": [{"message": {"role": "assistant", "content": "{}"}}]
        }))
        .unwrap();
        assert!(parsed.usage.is_none());
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("{}"));
    }
}
