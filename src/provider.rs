//! Provider selection.
//!
//! A [`ProviderConfig`] is an immutable value naming one backend and the
//! connection data it needs. It is validated when turned into an
//! [`Embedder`] / [`Generator`] pair, before any network call is made.

use crate::embedding::{Embedder, OllamaEmbedder, OpenAIEmbedder};
use crate::error::{Result, VeilederError};
use crate::generation::{AnthropicGenerator, Generator, OllamaGenerator, OpenAIGenerator};
use crate::http::Transport;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_ANTHROPIC_API_BASE: &str = "https://api.anthropic.com/v1";
pub const DEFAULT_ANTHROPIC_MAX_TOKENS: u32 = 1024;

/// Backend family.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Local inference server.
    #[default]
    Ollama,
    OpenAI,
    Anthropic,
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ollama" | "local" => Ok(ProviderKind::Ollama),
            "openai" => Ok(ProviderKind::OpenAI),
            "anthropic" | "claude" => Ok(ProviderKind::Anthropic),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::Ollama => write!(f, "ollama"),
            ProviderKind::OpenAI => write!(f, "openai"),
            ProviderKind::Anthropic => write!(f, "anthropic"),
        }
    }
}

/// Local inference server connection.
#[derive(Debug, Clone, PartialEq)]
pub struct OllamaConfig {
    pub url: String,
    pub embedding_model: String,
    pub llm_model: String,
}

impl OllamaConfig {
    pub fn new(url: &str, embedding_model: &str, llm_model: &str) -> Self {
        Self {
            url: url.to_string(),
            embedding_model: embedding_model.to_string(),
            llm_model: llm_model.to_string(),
        }
    }
}

/// OpenAI credentials and models.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenAIConfig {
    pub api_key: String,
    pub api_base: String,
    pub embedding_model: String,
    pub llm_model: String,
}

impl OpenAIConfig {
    pub fn new(api_key: &str, embedding_model: &str, llm_model: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            api_base: DEFAULT_OPENAI_API_BASE.to_string(),
            embedding_model: embedding_model.to_string(),
            llm_model: llm_model.to_string(),
        }
    }

    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.to_string();
        self
    }
}

/// Anthropic credentials and models.
///
/// Anthropic has no embedding API, so query embeddings go through OpenAI
/// using `embedding_api_key`.
#[derive(Debug, Clone, PartialEq)]
pub struct AnthropicConfig {
    pub api_key: String,
    pub api_base: String,
    pub llm_model: String,
    pub max_tokens: u32,
    pub embedding_model: String,
    pub embedding_api_key: Option<String>,
    pub embedding_api_base: String,
}

impl AnthropicConfig {
    pub fn new(api_key: &str, embedding_model: &str, llm_model: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            api_base: DEFAULT_ANTHROPIC_API_BASE.to_string(),
            llm_model: llm_model.to_string(),
            max_tokens: DEFAULT_ANTHROPIC_MAX_TOKENS,
            embedding_model: embedding_model.to_string(),
            embedding_api_key: None,
            embedding_api_base: DEFAULT_OPENAI_API_BASE.to_string(),
        }
    }

    /// OpenAI key used for query embeddings.
    pub fn with_embedding_key(mut self, api_key: Option<String>) -> Self {
        self.embedding_api_key = api_key;
        self
    }

    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.to_string();
        self
    }

    pub fn with_embedding_api_base(mut self, api_base: &str) -> Self {
        self.embedding_api_base = api_base.to_string();
        self
    }
}

/// The active backend and its connection data.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderConfig {
    Ollama(OllamaConfig),
    OpenAI(OpenAIConfig),
    Anthropic(AnthropicConfig),
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

impl ProviderConfig {
    pub fn kind(&self) -> ProviderKind {
        match self {
            ProviderConfig::Ollama(_) => ProviderKind::Ollama,
            ProviderConfig::OpenAI(_) => ProviderKind::OpenAI,
            ProviderConfig::Anthropic(_) => ProviderKind::Anthropic,
        }
    }

    /// Replace the generation model, keeping everything else.
    pub fn with_llm_model(mut self, model: &str) -> Self {
        match &mut self {
            ProviderConfig::Ollama(c) => c.llm_model = model.to_string(),
            ProviderConfig::OpenAI(c) => c.llm_model = model.to_string(),
            ProviderConfig::Anthropic(c) => c.llm_model = model.to_string(),
        }
        self
    }

    /// Generation model of this configuration.
    pub fn llm_model(&self) -> &str {
        match self {
            ProviderConfig::Ollama(c) => &c.llm_model,
            ProviderConfig::OpenAI(c) => &c.llm_model,
            ProviderConfig::Anthropic(c) => &c.llm_model,
        }
    }

    /// Check that the connection data this kind needs is present.
    pub fn validate(&self) -> Result<()> {
        match self {
            ProviderConfig::Ollama(c) => {
                if is_blank(&c.url) {
                    return Err(VeilederError::ProviderMisconfigured(
                        "Ollama URL is empty".to_string(),
                    ));
                }
                url::Url::parse(c.url.trim()).map_err(|e| {
                    VeilederError::ProviderMisconfigured(format!("invalid Ollama URL '{}': {}", c.url, e))
                })?;
            }
            ProviderConfig::OpenAI(c) => {
                if is_blank(&c.api_key) {
                    return Err(VeilederError::ProviderMisconfigured(
                        "OpenAI API key is missing. Set OPENAI_API_KEY or openai.api_key".to_string(),
                    ));
                }
            }
            ProviderConfig::Anthropic(c) => {
                if is_blank(&c.api_key) {
                    return Err(VeilederError::ProviderMisconfigured(
                        "Anthropic API key is missing. Set ANTHROPIC_API_KEY or anthropic.api_key"
                            .to_string(),
                    ));
                }
                if !c.embedding_api_key.as_deref().is_some_and(|k| !is_blank(k)) {
                    return Err(VeilederError::ProviderMisconfigured(
                        "Anthropic has no embedding API; query embeddings need an OpenAI API key \
                         (OPENAI_API_KEY or openai.api_key)"
                            .to_string(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Build the embedding backend for this configuration.
    pub fn embedder(&self, transport: Arc<dyn Transport>) -> Result<Box<dyn Embedder>> {
        self.validate()?;
        let embedder: Box<dyn Embedder> = match self {
            ProviderConfig::Ollama(c) => {
                Box::new(OllamaEmbedder::new(transport, c.url.trim(), &c.embedding_model))
            }
            ProviderConfig::OpenAI(c) => Box::new(OpenAIEmbedder::new(
                transport,
                &c.api_key,
                &c.api_base,
                &c.embedding_model,
            )),
            ProviderConfig::Anthropic(c) => Box::new(OpenAIEmbedder::new(
                transport,
                c.embedding_api_key.as_deref().unwrap_or_default(),
                &c.embedding_api_base,
                &c.embedding_model,
            )),
        };
        Ok(embedder)
    }

    /// Build the generation backend for this configuration.
    pub fn generator(&self, transport: Arc<dyn Transport>, system: &str) -> Result<Box<dyn Generator>> {
        self.validate()?;
        let generator: Box<dyn Generator> = match self {
            ProviderConfig::Ollama(c) => Box::new(OllamaGenerator::new(
                transport,
                c.url.trim(),
                &c.llm_model,
                system,
            )),
            ProviderConfig::OpenAI(c) => Box::new(OpenAIGenerator::new(
                transport,
                &c.api_key,
                &c.api_base,
                &c.llm_model,
                system,
            )),
            ProviderConfig::Anthropic(c) => Box::new(AnthropicGenerator::new(
                transport,
                &c.api_key,
                &c.api_base,
                &c.llm_model,
                system,
                c.max_tokens,
            )),
        };
        Ok(generator)
    }
}
