//! Query orchestrator for Veileder.
//!
//! Answers one question at a time: embed the question, rank the corpus,
//! compose the prompt and generate the answer. Each step finishes before the
//! next starts and the first error is returned as is.

use crate::config::{Prompts, Settings};
use crate::corpus::{self, Corpus};
use crate::error::{Result, VeilederError};
use crate::http::{HttpTransport, Transport};
use crate::provider::{AnthropicConfig, OllamaConfig, OpenAIConfig, ProviderConfig};
use crate::rag::{compose_prompt, QueryResult, SelectedChunk};
use crate::ranking::rank;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// The main orchestrator for question answering.
pub struct Orchestrator {
    corpus: Arc<Corpus>,
    transport: Arc<dyn Transport>,
    prompts: Prompts,
    provider: ProviderConfig,
}

impl Orchestrator {
    /// Create an orchestrator over `corpus` using the HTTP transport and default prompts.
    pub fn new(corpus: Arc<Corpus>, provider: ProviderConfig) -> Result<Self> {
        Ok(Self::with_components(
            corpus,
            Arc::new(HttpTransport::new()?),
            Prompts::default(),
            provider,
        ))
    }

    /// Load the corpus, prompts and active provider described by `settings`.
    ///
    /// Fails if the snapshot cannot be loaded.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let corpus = Arc::new(corpus::load(settings.corpus_path())?);

        Ok(Self::with_components(
            corpus,
            Arc::new(HttpTransport::new()?),
            prompts,
            settings.active_provider(),
        ))
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        corpus: Arc<Corpus>,
        transport: Arc<dyn Transport>,
        prompts: Prompts,
        provider: ProviderConfig,
    ) -> Self {
        Self {
            corpus,
            transport,
            prompts,
            provider,
        }
    }

    /// Get a reference to the corpus.
    pub fn corpus(&self) -> &Arc<Corpus> {
        &self.corpus
    }

    /// Get the active provider configuration.
    pub fn provider(&self) -> &ProviderConfig {
        &self.provider
    }

    /// Replace the active provider configuration.
    ///
    /// Nothing is validated here; a bad configuration fails the next query.
    pub fn set_provider(&mut self, provider: ProviderConfig) {
        self.provider = provider;
    }

    pub fn set_ollama_config(&mut self, config: OllamaConfig) {
        self.set_provider(ProviderConfig::Ollama(config));
    }

    pub fn set_openai_config(&mut self, config: OpenAIConfig) {
        self.set_provider(ProviderConfig::OpenAI(config));
    }

    pub fn set_anthropic_config(&mut self, config: AnthropicConfig) {
        self.set_provider(ProviderConfig::Anthropic(config));
    }

    /// Answer `question` with the active provider, grounding on the best `top_k` chunks.
    pub async fn query(&self, question: &str, top_k: usize) -> Result<QueryResult> {
        self.query_with(&self.provider, question, top_k).await
    }

    /// Answer `question` with an explicit provider configuration.
    #[instrument(skip(self, provider), fields(provider = %provider.kind(), question = %question))]
    pub async fn query_with(
        &self,
        provider: &ProviderConfig,
        question: &str,
        top_k: usize,
    ) -> Result<QueryResult> {
        check_request(question, top_k)?;

        // Both backends are validated before anything touches the network.
        let embedder = provider.embedder(self.transport.clone())?;
        let generator = provider.generator(self.transport.clone(), &self.prompts.rag.system)?;

        info!("Processing question: {}", question);

        let query_embedding = embedder.embed(question).await?;
        let ranked = rank(&query_embedding, &self.corpus, top_k)?;
        let chunks = SelectedChunk::from_ranked(&self.corpus, &ranked);

        let prompt = compose_prompt(&self.prompts, question, &chunks)?;
        debug!("Prompt is {} characters over {} chunks", prompt.len(), chunks.len());

        let answer = generator.generate(&prompt).await?;

        info!("Answered with {} sources", chunks.len());
        Ok(QueryResult { answer, chunks })
    }

    /// Retrieve the best `top_k` chunks for `question` without generating an answer.
    pub async fn retrieve(&self, question: &str, top_k: usize) -> Result<Vec<SelectedChunk>> {
        self.retrieve_with(&self.provider, question, top_k).await
    }

    /// Retrieval with an explicit provider configuration.
    #[instrument(skip(self, provider), fields(provider = %provider.kind(), question = %question))]
    pub async fn retrieve_with(
        &self,
        provider: &ProviderConfig,
        question: &str,
        top_k: usize,
    ) -> Result<Vec<SelectedChunk>> {
        check_request(question, top_k)?;

        let embedder = provider.embedder(self.transport.clone())?;
        let query_embedding = embedder.embed(question).await?;
        let ranked = rank(&query_embedding, &self.corpus, top_k)?;

        Ok(SelectedChunk::from_ranked(&self.corpus, &ranked))
    }
}

fn check_request(question: &str, top_k: usize) -> Result<()> {
    if question.trim().is_empty() {
        return Err(VeilederError::InvalidInput("question is empty".to_string()));
    }
    if top_k == 0 {
        return Err(VeilederError::InvalidInput(
            "result count must be at least 1".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::record;
    use crate::http::mock::{openai_chat_reply, openai_embedding_reply, MockTransport};
    use serde_json::json;

    fn three_chunk_corpus() -> Arc<Corpus> {
        Arc::new(
            Corpus::from_records(vec![
                record(1, 0.0, vec![1.0, 0.0]),
                record(2, 0.0, vec![0.0, 1.0]),
                record(3, 0.0, vec![0.7, 0.7]),
            ])
            .unwrap(),
        )
    }

    fn ollama() -> ProviderConfig {
        ProviderConfig::Ollama(OllamaConfig::new("http://localhost:11434", "bge-m3", "llama3.2"))
    }

    fn orchestrator(corpus: Arc<Corpus>, transport: &Arc<MockTransport>) -> Orchestrator {
        Orchestrator::with_components(corpus, transport.clone(), Prompts::default(), ollama())
    }

    #[tokio::test]
    async fn test_query_end_to_end() {
        let transport = Arc::new(MockTransport::new());
        transport.push_json(200, json!({"embeddings": [[1.0, 0.0]]}));
        transport.push_json(200, json!({"response": "Watch video 1 from the start."}));

        let result = orchestrator(three_chunk_corpus(), &transport)
            .query("Where is HTML introduced?", 2)
            .await
            .unwrap();

        assert_eq!(result.answer, "Watch video 1 from the start.");
        let rows: Vec<usize> = result.chunks.iter().map(|c| c.row).collect();
        assert_eq!(rows, vec![0, 2]);
        assert!((result.chunks[0].score - 1.0).abs() < 1e-6);
        assert!((result.chunks[1].score - 0.7071).abs() < 1e-3);

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        let prompt = requests[1].body["prompt"].as_str().unwrap();
        assert!(prompt.contains("\"title\":\"Video 1\""));
        assert!(prompt.contains("\"title\":\"Video 3\""));
        assert!(!prompt.contains("\"title\":\"Video 2\""));
        assert!(prompt.contains("User asked: \"Where is HTML introduced?\""));
        assert_eq!(
            requests[1].body["system"],
            "You are a helpful teaching assistant that guides students to relevant course content."
        );
    }

    #[tokio::test]
    async fn test_top_k_larger_than_corpus_is_clamped() {
        let corpus = Arc::new(
            Corpus::from_records(vec![record(1, 0.0, vec![1.0, 0.0]), record(2, 0.0, vec![0.0, 1.0])])
                .unwrap(),
        );
        let transport = Arc::new(MockTransport::new());
        transport.push_json(200, json!({"embeddings": [[0.5, 0.5]]}));
        transport.push_json(200, json!({"response": "ok"}));

        let result = orchestrator(corpus, &transport).query("q", 5).await.unwrap();
        assert_eq!(result.chunks.len(), 2);
    }

    #[tokio::test]
    async fn test_malformed_embedding_propagates() {
        let transport = Arc::new(MockTransport::new());
        transport.push_json(200, json!({"model": "bge-m3"}));

        let err = orchestrator(three_chunk_corpus(), &transport)
            .query("q", 2)
            .await
            .unwrap_err();
        assert!(matches!(err, VeilederError::ProviderResponse { ref provider, .. } if provider == "ollama"));
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_credentials_make_no_calls() {
        let transport = Arc::new(MockTransport::new());
        let mut orchestrator = orchestrator(three_chunk_corpus(), &transport);

        orchestrator.set_openai_config(OpenAIConfig::new("", "text-embedding-3-small", "gpt-4"));
        let err = orchestrator.query("q", 2).await.unwrap_err();
        assert!(matches!(err, VeilederError::ProviderMisconfigured(_)));

        // Anthropic key present, but no OpenAI key for embeddings
        orchestrator.set_anthropic_config(AnthropicConfig::new(
            "sk-ant",
            "text-embedding-3-small",
            "claude-3-haiku-20240307",
        ));
        let err = orchestrator.query("q", 2).await.unwrap_err();
        assert!(matches!(err, VeilederError::ProviderMisconfigured(_)));

        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_setter_switches_backend() {
        let transport = Arc::new(MockTransport::new());
        let mut orchestrator = orchestrator(three_chunk_corpus(), &transport);

        transport.push_json(200, json!({"embeddings": [[1.0, 0.0]]}));
        transport.push_json(200, json!({"response": "local answer"}));
        let local = orchestrator.query("q", 1).await.unwrap();
        assert_eq!(local.answer, "local answer");

        orchestrator.set_openai_config(OpenAIConfig::new("sk-test", "text-embedding-3-small", "gpt-4"));
        transport.push_json(200, openai_embedding_reply(&[0.0, 1.0]));
        transport.push_json(200, openai_chat_reply(&["remote answer"]));
        let remote = orchestrator.query("q", 1).await.unwrap();
        assert_eq!(remote.answer, "remote answer");
        assert_eq!(remote.chunks[0].row, 1);

        let urls: Vec<String> = transport.requests().into_iter().map(|r| r.url).collect();
        assert_eq!(
            urls,
            vec![
                "http://localhost:11434/api/embed",
                "http://localhost:11434/api/generate",
                "https://api.openai.com/v1/embeddings",
                "https://api.openai.com/v1/chat/completions",
            ]
        );
    }

    #[tokio::test]
    async fn test_query_with_leaves_active_config() {
        let transport = Arc::new(MockTransport::new());
        let orchestrator = orchestrator(three_chunk_corpus(), &transport);

        let explicit = ProviderConfig::OpenAI(OpenAIConfig::new("", "e", "g"));
        let err = orchestrator.query_with(&explicit, "q", 2).await.unwrap_err();
        assert!(matches!(err, VeilederError::ProviderMisconfigured(_)));
        assert_eq!(orchestrator.provider(), &ollama());
    }

    #[tokio::test]
    async fn test_generation_failure_discards_chunks() {
        let transport = Arc::new(MockTransport::new());
        transport.push_json(200, json!({"embeddings": [[1.0, 0.0]]}));
        transport.push_timeout();

        let err = orchestrator(three_chunk_corpus(), &transport)
            .query("q", 2)
            .await
            .unwrap_err();
        assert!(matches!(err, VeilederError::ProviderUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_dimension_mismatch_stops_before_generation() {
        let transport = Arc::new(MockTransport::new());
        transport.push_json(200, json!({"embeddings": [[1.0, 0.0, 0.0]]}));

        let err = orchestrator(three_chunk_corpus(), &transport)
            .query("q", 2)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            VeilederError::DimensionMismatch {
                expected: 2,
                actual: 3
            }
        ));
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_rejects_bad_requests_without_calls() {
        let transport = Arc::new(MockTransport::new());
        let orchestrator = orchestrator(three_chunk_corpus(), &transport);

        assert!(matches!(
            orchestrator.query("   ", 3).await,
            Err(VeilederError::InvalidInput(_))
        ));
        assert!(matches!(
            orchestrator.query("q", 0).await,
            Err(VeilederError::InvalidInput(_))
        ));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_retrieve_only_embeds() {
        let transport = Arc::new(MockTransport::new());
        transport.push_json(200, json!({"embeddings": [[0.0, 1.0]]}));

        let chunks = orchestrator(three_chunk_corpus(), &transport)
            .retrieve("q", 1)
            .await
            .unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].chunk.number, 2);
        assert_eq!(transport.call_count(), 1);
    }

    #[test]
    fn test_from_settings_requires_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.corpus.path = dir.path().join("missing.json").display().to_string();

        assert!(matches!(
            Orchestrator::from_settings(&settings),
            Err(VeilederError::StoreLoad(_))
        ));
    }
}
