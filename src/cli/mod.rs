//! CLI module for Veileder.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Veileder - course video teaching assistant
///
/// Ask questions about a course and get pointed to the videos and timestamps
/// that cover the topic.
#[derive(Parser, Debug)]
#[command(name = "veileder")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Provider to use (ollama, openai, anthropic); overrides the config file
    #[arg(short, long, global = true)]
    pub provider: Option<String>,

    /// Corpus snapshot path; overrides the config file
    #[arg(long, global = true)]
    pub corpus: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask a question about the course
    Ask {
        /// The question to ask
        question: String,

        /// Number of transcript chunks to retrieve
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// LLM model to use for the answer
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Find the transcript chunks closest to a query, without generating an answer
    Search {
        /// Search query
        query: String,

        /// Number of results
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },

    /// Show the loaded corpus and provider configuration
    Status,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Write the current configuration to the config file
    Init,

    /// Show configuration file path
    Path,
}
