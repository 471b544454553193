//! Answer generation with pluggable LLM backends.

mod anthropic;
mod ollama;
mod openai;

pub use anthropic::AnthropicGenerator;
pub use ollama::OllamaGenerator;
pub use openai::OpenAIGenerator;

use crate::error::Result;
use async_trait::async_trait;

/// Trait for free-text completion.
///
/// Every backend sends its system instruction separately from the prompt.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Complete `prompt` and return the answer text.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Backend name used in errors and logs.
    fn provider(&self) -> &'static str;
}
