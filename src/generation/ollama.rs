//! Local inference server (Ollama) completions.

use super::Generator;
use crate::error::Result;
use crate::http::{self, HttpRequest, Transport};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

const PROVIDER: &str = "ollama";

/// Local generation is slow on CPU-only hosts; allow two minutes.
const GENERATE_TIMEOUT: Duration = Duration::from_secs(120);

/// Generator backed by a local inference server.
pub struct OllamaGenerator {
    transport: Arc<dyn Transport>,
    url: String,
    model: String,
    system: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaGenerator {
    pub fn new(transport: Arc<dyn Transport>, url: &str, model: &str, system: &str) -> Self {
        Self {
            transport,
            url: url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            system: system.to_string(),
        }
    }
}

#[async_trait]
impl Generator for OllamaGenerator {
    #[instrument(skip(self, prompt), fields(model = %self.model))]
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = HttpRequest::new(
            format!("{}/api/generate", self.url),
            json!({
                "model": self.model,
                "system": self.system,
                "prompt": prompt,
                "stream": false,
            }),
        )
        .timeout(GENERATE_TIMEOUT);

        let response: GenerateResponse = http::post(self.transport.as_ref(), PROVIDER, request).await?;

        debug!("Generated {} characters", response.response.len());
        Ok(response.response)
    }

    fn provider(&self) -> &'static str {
        PROVIDER
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VeilederError;
    use crate::http::mock::MockTransport;

    #[tokio::test]
    async fn test_non_streaming_request() {
        let transport = Arc::new(MockTransport::new());
        transport.push_json(200, json!({"model": "llama3.2", "response": "See video 3.", "done": true}));

        let generator = OllamaGenerator::new(transport.clone(), "http://localhost:11434", "llama3.2", "be helpful");
        let answer = generator.generate("Where is flexbox covered?").await.unwrap();
        assert_eq!(answer, "See video 3.");

        let request = &transport.requests()[0];
        assert_eq!(request.url, "http://localhost:11434/api/generate");
        assert_eq!(request.body["stream"], false);
        assert_eq!(request.body["system"], "be helpful");
        assert_eq!(request.body["prompt"], "Where is flexbox covered?");
        assert_eq!(request.timeout, Some(Duration::from_secs(120)));
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let transport = Arc::new(MockTransport::new());
        transport.push_json(200, json!({"done": true}));

        let generator = OllamaGenerator::new(transport, "http://localhost:11434", "llama3.2", "s");
        let err = generator.generate("q").await.unwrap_err();
        assert!(matches!(err, VeilederError::ProviderResponse { .. }));
    }
}
