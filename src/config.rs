//! Configuration management for llmsieve
//!
//! Handles provider selection and server settings. API keys are never
//! stored in the file; they are read from the environment when a provider
//! is built, so a missing key only fails the provider that needs it.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Supported LLM backends
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Local Ollama daemon
    #[default]
    Ollama,
    OpenAI,
    Groq,
    OpenRouter,
    /// Hugging Face inference router (OpenAI-compatible)
    HuggingFace,
}

impl ProviderKind {
    /// Display name, also accepted by `from_name`
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ollama => "ollama",
            Self::OpenAI => "openai",
            Self::Groq => "groq",
            Self::OpenRouter => "openrouter",
            Self::HuggingFace => "huggingface",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::all()
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Base URL used when the config doesn't override it
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::Ollama => "http://localhost:11434",
            Self::OpenAI => "https://api.openai.com/v1",
            Self::Groq => "https://api.groq.com/openai/v1",
            Self::OpenRouter => "https://openrouter.ai/api/v1",
            Self::HuggingFace => "https://router.huggingface.co/v1",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Self::Ollama => "llama3",
            Self::OpenAI => "gpt-4o-mini",
            Self::Groq => "llama-3.1-8b-instant",
            Self::OpenRouter => "meta-llama/llama-3.1-8b-instruct",
            Self::HuggingFace => "meta-llama/Llama-3.1-8B-Instruct",
        }
    }

    /// Environment variable holding the API key, if the provider needs one
    pub fn api_key_env(&self) -> Option<&'static str> {
        match self {
            Self::Ollama => None,
            Self::OpenAI => Some("OPENAI_API_KEY"),
            Self::Groq => Some("GROQ_API_KEY"),
            Self::OpenRouter => Some("OPENROUTER_API_KEY"),
            Self::HuggingFace => Some("HUGGINGFACE_TOKEN"),
        }
    }

    /// Get all available options
    pub fn all() -> Vec<Self> {
        vec![
            Self::Ollama,
            Self::OpenAI,
            Self::Groq,
            Self::OpenRouter,
            Self::HuggingFace,
        ]
    }
}

/// Which provider and model routes are sent to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub model: String,
    /// Override of the provider's default base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Environment variable to read the API key from instead of the provider's default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
    /// OpenRouter attribution (`HTTP-Referer` header)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referer: Option<String>,
    /// OpenRouter attribution (`X-Title` header)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::for_kind(ProviderKind::default())
    }
}

impl ProviderConfig {
    /// Defaults for the given provider
    pub fn for_kind(kind: ProviderKind) -> Self {
        Self {
            kind,
            model: kind.default_model().to_string(),
            base_url: None,
            api_key_env: None,
            referer: None,
            title: None,
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Effective base URL without a trailing slash
    pub fn base_url(&self) -> String {
        self.base_url
            .as_deref()
            .unwrap_or(self.kind.default_base_url())
            .trim_end_matches('/')
            .to_string()
    }

    /// Resolve the API key from the environment.
    ///
    /// Returns `Ok(None)` for providers that don't need one.
    pub fn api_key(&self) -> Result<Option<String>> {
        self.api_key_with(|name| std::env::var(name).ok())
    }

    /// Environment variable the API key is read from, if any
    pub fn key_env(&self) -> Option<&str> {
        self.api_key_env.as_deref().or(self.kind.api_key_env())
    }

    /// Resolve the API key through `lookup` (the environment in production).
    pub fn api_key_with(&self, lookup: impl Fn(&str) -> Option<String>) -> Result<Option<String>> {
        let Some(var) = self.key_env() else {
            return Ok(None);
        };
        match lookup(var).filter(|key| !key.trim().is_empty()) {
            Some(key) => Ok(Some(key)),
            None => bail!("{} is not set; it is required for the {} provider", var, self.kind.name()),
        }
    }
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8005,
        }
    }
}

/// llmsieve configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub server: ServerConfig,
    /// Version of config schema (for future migrations)
    #[serde(default = "default_version")]
    pub version: u32,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            server: ServerConfig::default(),
            version: 1,
        }
    }
}

impl Config {
    /// Get the config file path (~/.llmsieve/config.toml)
    pub fn path() -> Result<PathBuf> {
        Ok(llmsieve_dir()?.join("config.toml"))
    }

    /// Check if config exists (i.e., not first run)
    pub fn exists() -> bool {
        Self::path().map(|p| p.exists()).unwrap_or(false)
    }

    /// Load config from disk, or return None if it doesn't exist
    pub fn load() -> Result<Option<Self>> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .context("Failed to read config file")?;
        let config: Self = toml::from_str(&content)
            .context("Failed to parse config file")?;
        Ok(Some(config))
    }

    /// Save config to disk
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;
        std::fs::write(path, content)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Load the config file (or defaults) and apply environment overrides.
    pub fn resolve() -> Result<Self> {
        let mut config = Self::load()?.unwrap_or_default();
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Apply `LLMSIEVE_PROVIDER`, `LLMSIEVE_MODEL` and `OLLAMA_HOST`.
    ///
    /// Switching provider resets the model to that provider's default
    /// unless `LLMSIEVE_MODEL` is also set.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(name) = lookup("LLMSIEVE_PROVIDER") {
            let kind = ProviderKind::from_name(&name)
                .with_context(|| format!("Unknown provider in LLMSIEVE_PROVIDER: {}", name))?;
            if kind != self.provider.kind {
                self.provider = ProviderConfig::for_kind(kind);
            }
        }
        if let Some(model) = lookup("LLMSIEVE_MODEL") {
            self.provider.model = model;
        }
        if self.provider.kind == ProviderKind::Ollama {
            if let Some(host) = lookup("OLLAMA_HOST") {
                self.provider.base_url = Some(host);
            }
        }
        Ok(())
    }
}

/// Get the base directory path (~/.llmsieve)
pub fn llmsieve_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".llmsieve"))
}
