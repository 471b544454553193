//! Configuration settings for Veileder.

use crate::provider::{
    AnthropicConfig, OllamaConfig, OpenAIConfig, ProviderConfig, ProviderKind,
    DEFAULT_ANTHROPIC_API_BASE, DEFAULT_ANTHROPIC_MAX_TOKENS, DEFAULT_OPENAI_API_BASE,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub corpus: CorpusSettings,
    pub provider: ProviderSettings,
    pub ollama: OllamaSettings,
    pub openai: OpenAISettings,
    pub anthropic: AnthropicSettings,
    pub prompts: PromptSettings,
}

/// Snapshot location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusSettings {
    /// Path to the corpus snapshot (JSON records or JSON Lines).
    pub path: String,
}

impl Default for CorpusSettings {
    fn default() -> Self {
        Self {
            path: "embeddings.json".to_string(),
        }
    }
}

/// Active backend and retrieval size.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// Backend (ollama, openai, anthropic).
    pub kind: ProviderKind,
    /// Number of chunks retrieved per question.
    pub top_k: usize,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            kind: ProviderKind::Ollama,
            top_k: 5,
        }
    }
}

/// Local inference server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaSettings {
    pub url: String,
    pub embedding_model: String,
    pub llm_model: String,
}

impl Default for OllamaSettings {
    fn default() -> Self {
        Self {
            url: "http://localhost:11434".to_string(),
            embedding_model: "bge-m3".to_string(),
            llm_model: "llama3.2".to_string(),
        }
    }
}

/// OpenAI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAISettings {
    /// API key (falls back to OPENAI_API_KEY).
    pub api_key: Option<String>,
    pub api_base: String,
    pub embedding_model: String,
    pub llm_model: String,
}

impl Default for OpenAISettings {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_OPENAI_API_BASE.to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
            llm_model: "gpt-3.5-turbo".to_string(),
        }
    }
}

/// Anthropic settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnthropicSettings {
    /// API key (falls back to ANTHROPIC_API_KEY).
    pub api_key: Option<String>,
    pub api_base: String,
    /// OpenAI embedding model used for queries.
    pub embedding_model: String,
    pub llm_model: String,
    /// Upper bound on answer length.
    pub max_tokens: u32,
}

impl Default for AnthropicSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_ANTHROPIC_API_BASE.to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
            llm_model: "claude-3-haiku-20240307".to_string(),
            max_tokens: DEFAULT_ANTHROPIC_MAX_TOKENS,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    ///
    /// Environment variables are applied on top of the file.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        let mut settings = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Settings::default()
        };

        settings.apply_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    /// Apply environment overrides using `lookup` to read variables.
    ///
    /// `EMBEDDING_MODEL` and `LLM_MODEL` set the local server's models.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(path) = lookup("EMBEDDINGS_PATH") {
            self.corpus.path = path;
        }
        if let Some(url) = lookup("OLLAMA_URL") {
            self.ollama.url = url;
        }
        if let Some(model) = lookup("EMBEDDING_MODEL") {
            self.ollama.embedding_model = model;
        }
        if let Some(model) = lookup("LLM_MODEL") {
            self.ollama.llm_model = model;
        }
        if let Some(key) = lookup("OPENAI_API_KEY") {
            self.openai.api_key = Some(key);
        }
        if let Some(key) = lookup("ANTHROPIC_API_KEY") {
            self.anthropic.api_key = Some(key);
        }
    }

    /// Build the provider configuration for `kind` from these settings.
    pub fn provider_config(&self, kind: ProviderKind) -> ProviderConfig {
        match kind {
            ProviderKind::Ollama => ProviderConfig::Ollama(OllamaConfig::new(
                &self.ollama.url,
                &self.ollama.embedding_model,
                &self.ollama.llm_model,
            )),
            ProviderKind::OpenAI => ProviderConfig::OpenAI(
                OpenAIConfig::new(
                    self.openai.api_key.as_deref().unwrap_or_default(),
                    &self.openai.embedding_model,
                    &self.openai.llm_model,
                )
                .with_api_base(&self.openai.api_base),
            ),
            ProviderKind::Anthropic => {
                let mut config = AnthropicConfig::new(
                    self.anthropic.api_key.as_deref().unwrap_or_default(),
                    &self.anthropic.embedding_model,
                    &self.anthropic.llm_model,
                )
                .with_api_base(&self.anthropic.api_base)
                .with_embedding_key(self.openai.api_key.clone())
                .with_embedding_api_base(&self.openai.api_base);
                config.max_tokens = self.anthropic.max_tokens;
                ProviderConfig::Anthropic(config)
            }
        }
    }

    /// Provider configuration for the configured default kind.
    pub fn active_provider(&self) -> ProviderConfig {
        self.provider_config(self.provider.kind)
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::VeilederError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("veileder")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded corpus snapshot path.
    pub fn corpus_path(&self) -> PathBuf {
        Self::expand_path(&self.corpus.path)
    }
}
