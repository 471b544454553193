//! Veileder - Course Video Teaching Assistant
//!
//! Answers questions about a video course from a precomputed corpus of
//! embedded transcript chunks, and points the student to the videos and
//! timestamps that cover the topic.
//!
//! The name "Veileder" is Norwegian for "supervisor" or "tutor."
//!
//! # Overview
//!
//! A query goes through four steps:
//! - Embed the question with the active provider
//! - Rank every corpus chunk by cosine similarity and keep the top K
//! - Compose a prompt from the question and the selected chunks
//! - Generate an answer with the active provider's language model
//!
//! # Architecture
//!
//! - `config` - Settings and prompt templates
//! - `corpus` - Snapshot loading and the in-memory embedding matrix
//! - `ranking` - Cosine similarity top-K selection
//! - `http` - Transport seam shared by every provider backend
//! - `embedding` - Query embedding backends
//! - `generation` - Answer generation backends
//! - `provider` - Provider selection and per-provider configuration
//! - `rag` - Prompt composition and query results
//! - `orchestrator` - Query pipeline coordination
//!
//! # Example
//!
//! ```rust,no_run
//! use veileder::config::Settings;
//! use veileder::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::from_settings(&settings)?;
//!
//!     let result = orchestrator.query("How do I center a div?", 5).await?;
//!     println!("{}", result.format_for_display());
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod corpus;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod http;
pub mod orchestrator;
pub mod provider;
pub mod rag;
pub mod ranking;

pub use error::{Result, VeilederError};
