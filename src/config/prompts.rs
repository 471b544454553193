//! Prompt templates for Veileder.
//!
//! Prompts can be customized by placing a `rag.toml` file in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Course description used when no `course` variable is configured.
pub const DEFAULT_COURSE: &str = "web development in my Sigma WDT course";

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub rag: RagPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

/// Prompts for answer generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagPrompts {
    /// System instruction sent separately from the user prompt.
    pub system: String,
    /// Question prompt. Placeholders: `{{course}}`, `{{chunks}}`, `{{question}}`.
    pub user: String,
}

impl Default for RagPrompts {
    fn default() -> Self {
        Self {
            system: "You are a helpful teaching assistant that guides students to relevant course content."
                .to_string(),

            user: r#"I am teaching {{course}}. Here are subtitle chunks containing:
video title, video number, start time, end time, text:

{{chunks}}
---------------------------------
User asked: "{{question}}"

Answer in a human-friendly tone, clearly explaining:
- which video has relevant content
- timestamps to view
- what that content teaches

If the user's question is unrelated to this course, politely tell them that you can only answer questions related to the video content.
"#
            .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let rag_path = custom_path.join("rag.toml");
            if rag_path.exists() {
                let content = std::fs::read_to_string(&rag_path)?;
                prompts.rag = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    ///
    /// Single pass: substituted values are never scanned for placeholders,
    /// and unknown placeholders are left as they are.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut result = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(open) = rest.find("{{") {
            result.push_str(&rest[..open]);
            let after = &rest[open + 2..];
            match after.find("}}") {
                Some(close) => {
                    let key = &after[..close];
                    match vars.get(key.trim()) {
                        Some(value) => result.push_str(value),
                        None => {
                            result.push_str("{{");
                            result.push_str(key);
                            result.push_str("}}");
                        }
                    }
                    rest = &after[close + 2..];
                }
                None => {
                    result.push_str(&rest[open..]);
                    rest = "";
                }
            }
        }
        result.push_str(rest);
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = HashMap::new();
        merged.insert("course".to_string(), DEFAULT_COURSE.to_string());
        merged.extend(self.variables.clone());
        merged.extend(vars.clone());
        Self::render(template, &merged)
    }
}
