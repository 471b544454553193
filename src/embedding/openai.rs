//! OpenAI embeddings implementation.

use super::Embedder;
use crate::error::{Result, VeilederError};
use crate::http::{self, HttpRequest, Transport};
use async_openai::types::{CreateEmbeddingRequestArgs, CreateEmbeddingResponse, EmbeddingInput};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, instrument};

const PROVIDER: &str = "openai";

/// OpenAI-based embedder.
///
/// Issues one request per input text.
pub struct OpenAIEmbedder {
    transport: Arc<dyn Transport>,
    api_key: String,
    api_base: String,
    model: String,
}

impl OpenAIEmbedder {
    pub fn new(transport: Arc<dyn Transport>, api_key: &str, api_base: &str, model: &str) -> Self {
        Self {
            transport,
            api_key: api_key.trim().to_string(),
            api_base: api_base.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    async fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        let request = CreateEmbeddingRequestArgs::default()
            .model(&self.model)
            .input(EmbeddingInput::StringArray(vec![text.to_string()]))
            .build()
            .map_err(|e| VeilederError::Config(format!("Failed to build embedding request: {}", e)))?;

        let request = HttpRequest::new(
            format!("{}/embeddings", self.api_base),
            serde_json::to_value(&request)?,
        )
        .header("Authorization", format!("Bearer {}", self.api_key));

        let response: CreateEmbeddingResponse =
            http::post(self.transport.as_ref(), PROVIDER, request).await?;

        response
            .data
            .into_iter()
            .min_by_key(|d| d.index)
            .map(|d| d.embedding)
            .ok_or_else(|| VeilederError::response(PROVIDER, "response contained no embeddings"))
    }
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    #[instrument(skip(self, texts), fields(count = texts.len(), model = %self.model))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if self.api_key.is_empty() {
            return Err(VeilederError::auth(PROVIDER, "no API key configured"));
        }

        let mut all_embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            all_embeddings.push(self.embed_one(text).await?);
        }

        debug!("Generated {} embeddings", all_embeddings.len());
        Ok(all_embeddings)
    }

    fn provider(&self) -> &'static str {
        PROVIDER
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::mock::{openai_embedding_reply as embedding_reply, MockTransport};
    use serde_json::json;

    #[tokio::test]
    async fn test_one_request_per_text_in_order() {
        let transport = Arc::new(MockTransport::new());
        transport.push_json(200, embedding_reply(&[1.0, 0.0]));
        transport.push_json(200, embedding_reply(&[0.0, 1.0]));

        let embedder = OpenAIEmbedder::new(
            transport.clone(),
            "sk-test",
            "https://api.openai.com/v1",
            "text-embedding-3-small",
        );
        let texts = vec!["first".to_string(), "second".to_string()];
        let vectors = embedder.embed_batch(&texts).await.unwrap();

        assert_eq!(vectors, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
        assert_eq!(transport.call_count(), 2);

        let requests = transport.requests();
        assert_eq!(requests[0].url, "https://api.openai.com/v1/embeddings");
        assert_eq!(requests[0].body["model"], "text-embedding-3-small");
        assert_eq!(requests[0].body["input"], json!(["first"]));
        assert_eq!(requests[1].body["input"], json!(["second"]));
        assert!(requests[0]
            .headers
            .contains(&("Authorization".to_string(), "Bearer sk-test".to_string())));
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_request() {
        let transport = Arc::new(MockTransport::new());
        let embedder = OpenAIEmbedder::new(transport.clone(), "  ", "https://api.openai.com/v1", "m");

        let err = embedder.embed("hello").await.unwrap_err();
        assert!(matches!(err, VeilederError::ProviderAuth { .. }));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_rejected_key_and_rate_limit() {
        let transport = Arc::new(MockTransport::new());
        transport.push_json(401, json!({"error": {"message": "Incorrect API key"}}));
        transport.push_json(429, json!({"error": {"message": "Rate limit reached"}}));

        let embedder = OpenAIEmbedder::new(transport.clone(), "sk-bad", "https://api.openai.com/v1", "m");
        assert!(matches!(
            embedder.embed("a").await.unwrap_err(),
            VeilederError::ProviderAuth { .. }
        ));
        assert!(matches!(
            embedder.embed("b").await.unwrap_err(),
            VeilederError::ProviderRateLimit { .. }
        ));
    }

    #[tokio::test]
    async fn test_empty_data_is_response_error() {
        let transport = Arc::new(MockTransport::new());
        transport.push_json(
            200,
            json!({
                "object": "list",
                "data": [],
                "model": "m",
                "usage": {"prompt_tokens": 0, "total_tokens": 0}
            }),
        );

        let embedder = OpenAIEmbedder::new(transport.clone(), "sk-test", "https://api.openai.com/v1", "m");
        let err = embedder.embed("a").await.unwrap_err();
        assert!(matches!(err, VeilederError::ProviderResponse { .. }));
    }

    #[tokio::test]
    async fn test_incomplete_body_is_response_error() {
        let transport = Arc::new(MockTransport::new());
        transport.push_json(200, json!({"data": [{"embedding": [1.0]}]}));

        let embedder = OpenAIEmbedder::new(transport.clone(), "sk-test", "https://api.openai.com/v1", "m");
        let err = embedder.embed("a").await.unwrap_err();
        assert!(matches!(err, VeilederError::ProviderResponse { .. }));
    }
}
