//! Query results.

use super::SelectedChunk;

/// An answer together with the chunks it was grounded on.
#[derive(Debug, Clone)]
pub struct QueryResult {
    /// The generated answer.
    pub answer: String,
    /// Retrieved chunks, best match first.
    pub chunks: Vec<SelectedChunk>,
}

impl QueryResult {
    /// Format the result for display.
    pub fn format_for_display(&self) -> String {
        let mut output = self.answer.clone();

        if !self.chunks.is_empty() {
            output.push_str("\n\n--- Relevant Video Sections ---\n");
            for selected in &self.chunks {
                output.push_str(&format!(
                    "\nVideo {}: {} @ {} ({}, score: {:.2})",
                    selected.chunk.number,
                    selected.chunk.title,
                    selected.chunk.format_timestamp(),
                    selected.chunk.time_range(),
                    selected.score
                ));
            }
        }

        output
    }
}
