//! OpenAI chat completions.

use super::Generator;
use crate::error::{Result, VeilederError};
use crate::http::{self, HttpRequest, Transport};
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    CreateChatCompletionResponse,
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, instrument};

const PROVIDER: &str = "openai";

const TEMPERATURE: f32 = 0.7;

/// Generator using the OpenAI chat completions API.
pub struct OpenAIGenerator {
    transport: Arc<dyn Transport>,
    api_key: String,
    api_base: String,
    model: String,
    system: String,
}

impl OpenAIGenerator {
    pub fn new(
        transport: Arc<dyn Transport>,
        api_key: &str,
        api_base: &str,
        model: &str,
        system: &str,
    ) -> Self {
        Self {
            transport,
            api_key: api_key.trim().to_string(),
            api_base: api_base.trim_end_matches('/').to_string(),
            model: model.to_string(),
            system: system.to_string(),
        }
    }
}

fn build_error(e: impl std::fmt::Display) -> VeilederError {
    VeilederError::Config(format!("Failed to build chat request: {}", e))
}

#[async_trait]
impl Generator for OpenAIGenerator {
    #[instrument(skip(self, prompt), fields(model = %self.model))]
    async fn generate(&self, prompt: &str) -> Result<String> {
        if self.api_key.is_empty() {
            return Err(VeilederError::auth(PROVIDER, "no API key configured"));
        }

        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(self.system.clone())
                .build()
                .map_err(build_error)?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt.to_string())
                .build()
                .map_err(build_error)?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(TEMPERATURE)
            .build()
            .map_err(build_error)?;

        let request = HttpRequest::new(
            format!("{}/chat/completions", self.api_base),
            serde_json::to_value(&request)?,
        )
        .header("Authorization", format!("Bearer {}", self.api_key));

        let response: CreateChatCompletionResponse =
            http::post(self.transport.as_ref(), PROVIDER, request).await?;

        let answer = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| VeilederError::response(PROVIDER, "empty response from LLM"))?;

        debug!("Generated {} characters", answer.len());
        Ok(answer)
    }

    fn provider(&self) -> &'static str {
        PROVIDER
    }
}
