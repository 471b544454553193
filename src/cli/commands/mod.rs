//! CLI command implementations.

mod ask;
mod config;
mod search;
mod status;

pub use ask::run_ask;
pub use config::run_config;
pub use search::run_search;
pub use status::run_status;

use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;

/// Load the corpus and build the orchestrator, reporting a missing snapshot clearly.
fn load_orchestrator(settings: &Settings) -> anyhow::Result<Orchestrator> {
    match Orchestrator::from_settings(settings) {
        Ok(orchestrator) => Ok(orchestrator),
        Err(e) => {
            Output::error(&format!("{}", e));
            Output::info(&format!(
                "Expected a corpus snapshot at {}. Set EMBEDDINGS_PATH or corpus.path.",
                settings.corpus_path().display()
            ));
            Err(e.into())
        }
    }
}
