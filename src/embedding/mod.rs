//! Embedding generation for query retrieval.

mod ollama;
mod openai;

pub use ollama::OllamaEmbedder;
pub use openai::OpenAIEmbedder;

use crate::error::{Result, VeilederError};
use async_trait::async_trait;

/// Trait for embedding generation.
///
/// `embed_batch` returns exactly one vector per input text, in input order.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate embeddings for multiple texts.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| VeilederError::response(self.provider(), "empty embedding response"))
    }

    /// Backend name used in errors and logs.
    fn provider(&self) -> &'static str;
}
