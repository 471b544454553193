//! Local inference server (Ollama) embeddings.

use super::Embedder;
use crate::error::{Result, VeilederError};
use crate::http::{self, HttpRequest, Transport};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

const PROVIDER: &str = "ollama";

/// Embedding requests to the local server time out after a minute.
const EMBED_TIMEOUT: Duration = Duration::from_secs(60);

/// Embedder backed by a local inference server.
///
/// Sends the whole batch in one request.
pub struct OllamaEmbedder {
    transport: Arc<dyn Transport>,
    url: String,
    model: String,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

impl OllamaEmbedder {
    pub fn new(transport: Arc<dyn Transport>, url: &str, model: &str) -> Self {
        Self {
            transport,
            url: url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    #[instrument(skip(self, texts), fields(count = texts.len(), model = %self.model))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = HttpRequest::new(
            format!("{}/api/embed", self.url),
            json!({ "model": self.model, "input": texts }),
        )
        .timeout(EMBED_TIMEOUT);

        let response: EmbedResponse = http::post(self.transport.as_ref(), PROVIDER, request).await?;

        if response.embeddings.len() != texts.len() {
            return Err(VeilederError::response(
                PROVIDER,
                format!(
                    "expected {} embeddings, got {}",
                    texts.len(),
                    response.embeddings.len()
                ),
            ));
        }

        debug!("Generated {} embeddings", response.embeddings.len());
        Ok(response.embeddings)
    }

    fn provider(&self) -> &'static str {
        PROVIDER
    }
}
