//! Ask command implementation.

use super::load_orchestrator;
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// Run the ask command.
pub async fn run_ask(
    question: &str,
    top_k: Option<usize>,
    model: Option<String>,
    settings: Settings,
) -> Result<()> {
    let orchestrator = load_orchestrator(&settings)?;

    let top_k = top_k.unwrap_or(settings.provider.top_k);
    let provider = match model {
        Some(model) => settings.active_provider().with_llm_model(&model),
        None => settings.active_provider(),
    };

    let spinner = Output::spinner("Searching and generating response...");
    let result = orchestrator.query_with(&provider, question, top_k).await;
    spinner.finish_and_clear();

    match result {
        Ok(result) => {
            Output::header("Answer");
            println!("\n{}\n", result.answer);

            if !result.chunks.is_empty() {
                Output::header("Relevant Video Sections");
                for selected in &result.chunks {
                    Output::video_section(selected);
                }
            }
        }
        Err(e) => {
            Output::error(&format!("Failed to generate answer: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
