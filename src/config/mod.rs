//! Configuration module for Veileder.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{Prompts, RagPrompts, DEFAULT_COURSE};
pub use settings::{
    AnthropicSettings, CorpusSettings, OllamaSettings, OpenAISettings, PromptSettings,
    ProviderSettings, Settings,
};
