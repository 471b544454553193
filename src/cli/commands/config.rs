//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::Result;

/// Run the config command.
pub fn run_config(action: &ConfigAction, settings: Settings) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let mut redacted = settings;
            redacted.openai.api_key = redacted.openai.api_key.as_deref().map(mask_key);
            redacted.anthropic.api_key = redacted.anthropic.api_key.as_deref().map(mask_key);

            let toml_str = toml::to_string_pretty(&redacted)
                .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
            println!("{}", toml_str);
        }

        ConfigAction::Init => {
            let config_path = Settings::default_config_path();
            if config_path.exists() {
                Output::warning(&format!("Config already exists at {}", config_path.display()));
                return Ok(());
            }

            // Keys stay in the environment, not on disk
            let mut on_disk = settings;
            on_disk.openai.api_key = None;
            on_disk.anthropic.api_key = None;
            on_disk.save_to(&config_path)?;
            Output::success(&format!("Created default config at {}", config_path.display()));
        }

        ConfigAction::Path => {
            let config_path = Settings::default_config_path();
            println!("{}", config_path.display());
        }
    }

    Ok(())
}

/// Keep the first and last four characters of a key.
pub(crate) fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 12 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}
