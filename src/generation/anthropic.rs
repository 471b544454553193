//! Anthropic messages API.

use super::Generator;
use crate::error::{Result, VeilederError};
use crate::http::{self, HttpRequest, Transport};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument};

const PROVIDER: &str = "anthropic";

const API_VERSION: &str = "2023-06-01";

/// Generator using the Anthropic messages API.
pub struct AnthropicGenerator {
    transport: Arc<dyn Transport>,
    api_key: String,
    api_base: String,
    model: String,
    system: String,
    max_tokens: u32,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

impl AnthropicGenerator {
    pub fn new(
        transport: Arc<dyn Transport>,
        api_key: &str,
        api_base: &str,
        model: &str,
        system: &str,
        max_tokens: u32,
    ) -> Self {
        Self {
            transport,
            api_key: api_key.trim().to_string(),
            api_base: api_base.trim_end_matches('/').to_string(),
            model: model.to_string(),
            system: system.to_string(),
            max_tokens,
        }
    }
}

#[async_trait]
impl Generator for AnthropicGenerator {
    #[instrument(skip(self, prompt), fields(model = %self.model))]
    async fn generate(&self, prompt: &str) -> Result<String> {
        if self.api_key.is_empty() {
            return Err(VeilederError::auth(PROVIDER, "no API key configured"));
        }

        let body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            system: &self.system,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let request = HttpRequest::new(
            format!("{}/messages", self.api_base),
            serde_json::to_value(&body)?,
        )
        .header("x-api-key", self.api_key.clone())
        .header("anthropic-version", API_VERSION);

        let response: MessagesResponse = http::post(self.transport.as_ref(), PROVIDER, request).await?;

        let answer = match response.content.into_iter().next() {
            Some(ContentBlock::Text { text }) => text,
            Some(ContentBlock::Other) => {
                return Err(VeilederError::response(PROVIDER, "first content block is not text"))
            }
            None => return Err(VeilederError::response(PROVIDER, "response has no content")),
        };

        debug!("Generated {} characters", answer.len());
        Ok(answer)
    }

    fn provider(&self) -> &'static str {
        PROVIDER
    }
}
