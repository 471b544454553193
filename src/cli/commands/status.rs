//! Status command - show the corpus and provider readiness.

use super::config::mask_key;
use crate::cli::Output;
use crate::config::Settings;
use crate::corpus;
use crate::provider::{ProviderConfig, ProviderKind};
use console::style;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run the status checks.
pub fn run_status(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Veileder Status");
    println!();

    let mut checks = Vec::new();

    println!("{}", style("Corpus").bold());
    let corpus_check = check_corpus(settings);
    corpus_check.print();
    checks.push(corpus_check);
    println!();

    println!("{}", style("Provider").bold());
    let provider = settings.active_provider();
    Output::kv("Active", &provider.kind().to_string());
    Output::kv("Model", provider.llm_model());
    let provider_check = check_provider(&provider);
    provider_check.print();
    checks.push(provider_check);
    println!();

    println!("{}", style("Configuration").bold());
    let config_check = check_config_file();
    config_check.print();
    checks.push(config_check);
    println!();

    summarize(&checks)
}

/// Report the outcome; any failed check makes the command fail.
fn summarize(checks: &[CheckResult]) -> anyhow::Result<()> {
    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    if errors > 0 {
        Output::error(&format!("{} problem(s) found. Queries will fail until they are fixed.", errors));
        anyhow::bail!("status found {} problem(s)", errors);
    }

    Output::success("Ready to answer questions.");
    Ok(())
}

fn check_corpus(settings: &Settings) -> CheckResult {
    let path = settings.corpus_path();
    match corpus::load(&path) {
        Ok(corpus) => {
            let stats = corpus.stats();
            CheckResult::ok(
                "Snapshot",
                &format!(
                    "{} chunks from {} videos ({} dimensions) in {}",
                    stats.chunks,
                    stats.videos,
                    stats.dimension,
                    path.display()
                ),
            )
        }
        Err(e) => CheckResult::error(
            "Snapshot",
            &e.to_string(),
            "Set EMBEDDINGS_PATH or corpus.path to a JSON / JSON Lines snapshot",
        ),
    }
}

fn check_provider(provider: &ProviderConfig) -> CheckResult {
    let name = provider.kind().to_string();
    match provider.validate() {
        Ok(()) => {
            let detail = match provider {
                ProviderConfig::Ollama(c) => format!("endpoint {}", c.url),
                ProviderConfig::OpenAI(c) => format!("key {}", mask_key(&c.api_key)),
                ProviderConfig::Anthropic(c) => format!("key {}", mask_key(&c.api_key)),
            };
            CheckResult::ok(&name, &format!("configured ({})", detail))
        }
        Err(e) => CheckResult::error(&name, &e.to_string(), hint_for(provider.kind())),
    }
}

fn hint_for(kind: ProviderKind) -> &'static str {
    match kind {
        ProviderKind::Ollama => "Set OLLAMA_URL or ollama.url",
        ProviderKind::OpenAI => "Set with: export OPENAI_API_KEY='sk-...'",
        ProviderKind::Anthropic => {
            "Set ANTHROPIC_API_KEY, and OPENAI_API_KEY for query embeddings"
        }
    }
}

fn check_config_file() -> CheckResult {
    let config_path = Settings::default_config_path();
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: veileder config init",
        )
    }
}
