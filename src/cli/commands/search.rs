//! Search command implementation.

use super::load_orchestrator;
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// Run the search command.
pub async fn run_search(query: &str, top_k: Option<usize>, settings: Settings) -> Result<()> {
    let orchestrator = load_orchestrator(&settings)?;
    let top_k = top_k.unwrap_or(settings.provider.top_k);

    let spinner = Output::spinner("Searching...");
    let results = orchestrator.retrieve(query, top_k).await;
    spinner.finish_and_clear();

    match results {
        Ok(chunks) => {
            Output::success(&format!("Found {} results", chunks.len()));
            for selected in &chunks {
                Output::video_section(selected);
            }
        }
        Err(e) => {
            Output::error(&format!("Search failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
