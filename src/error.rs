//! Error types for Veileder.

use thiserror::Error;

/// Library-level error type for Veileder operations.
#[derive(Error, Debug)]
pub enum VeilederError {
    #[error("Failed to load corpus snapshot: {0}")]
    StoreLoad(String),

    #[error("Provider misconfigured: {0}")]
    ProviderMisconfigured(String),

    #[error("{provider} rejected the credentials: {message}")]
    ProviderAuth { provider: String, message: String },

    #[error("{provider} rate limit exceeded: {message}")]
    ProviderRateLimit { provider: String, message: String },

    #[error("{provider} is unavailable: {message}")]
    ProviderUnavailable { provider: String, message: String },

    #[error("Unexpected response from {provider}: {message}")]
    ProviderResponse { provider: String, message: String },

    #[error(
        "Query embedding has {actual} dimensions but the corpus uses {expected}. \
         Was the snapshot built with a different embedding model?"
    )]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl VeilederError {
    pub(crate) fn auth(provider: &str, message: impl Into<String>) -> Self {
        Self::ProviderAuth {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn rate_limit(provider: &str, message: impl Into<String>) -> Self {
        Self::ProviderRateLimit {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn unavailable(provider: &str, message: impl Into<String>) -> Self {
        Self::ProviderUnavailable {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn response(provider: &str, message: impl Into<String>) -> Self {
        Self::ProviderResponse {
            provider: provider.to_string(),
            message: message.into(),
        }
    }
}

/// Result type alias for Veileder operations.
pub type Result<T> = std::result::Result<T, VeilederError>;
