//! RAG (Retrieval-Augmented Generation) building blocks.
//!
//! Turns ranked corpus rows into prompt context and carries the answer back
//! to the caller together with the chunks it was grounded on.

pub mod context;
mod response;

pub use context::compose_prompt;
pub use response::QueryResult;

use crate::corpus::{Chunk, Corpus};
use crate::ranking::Ranked;

/// A retrieved chunk with its similarity score.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedChunk {
    /// Row in the corpus.
    pub row: usize,
    pub chunk: Chunk,
    /// Cosine similarity to the question.
    pub score: f32,
}

impl SelectedChunk {
    /// Resolve ranked rows against the corpus, keeping rank order.
    pub fn from_ranked(corpus: &Corpus, ranked: &[Ranked]) -> Vec<SelectedChunk> {
        ranked
            .iter()
            .filter_map(|r| {
                corpus.chunk(r.row).map(|chunk| SelectedChunk {
                    row: r.row,
                    chunk: chunk.clone(),
                    score: r.score,
                })
            })
            .collect()
    }
}
