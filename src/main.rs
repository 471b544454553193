//! Veileder CLI entry point.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use veileder::cli::{commands, Cli, Commands};
use veileder::config::Settings;
use veileder::provider::ProviderKind;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("veileder={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let mut settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    if let Some(provider) = &cli.provider {
        settings.provider.kind = provider
            .parse::<ProviderKind>()
            .map_err(|e| anyhow::anyhow!(e))?;
    }
    if let Some(corpus) = &cli.corpus {
        settings.corpus.path = corpus.clone();
    }

    // Execute command
    match &cli.command {
        Commands::Ask {
            question,
            top_k,
            model,
        } => {
            commands::run_ask(question, *top_k, model.clone(), settings).await?;
        }

        Commands::Search { query, top_k } => {
            commands::run_search(query, *top_k, settings).await?;
        }

        Commands::Status => {
            commands::run_status(&settings)?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings)?;
        }
    }

    Ok(())
}
