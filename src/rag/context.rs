//! Prompt composition from retrieved chunks.

use super::SelectedChunk;
use crate::config::Prompts;
use crate::error::Result;
use serde::Serialize;
use std::collections::HashMap;

/// The chunk fields shown to the model, in prompt order.
#[derive(Serialize)]
struct PromptRecord<'a> {
    title: &'a str,
    number: i64,
    start: f64,
    end: f64,
    text: &'a str,
}

/// Serialize selected chunks as a compact JSON array of records.
pub fn format_context_for_prompt(chunks: &[SelectedChunk]) -> Result<String> {
    let records: Vec<PromptRecord<'_>> = chunks
        .iter()
        .map(|s| PromptRecord {
            title: &s.chunk.title,
            number: s.chunk.number,
            start: s.chunk.start,
            end: s.chunk.end,
            text: &s.chunk.text,
        })
        .collect();
    Ok(serde_json::to_string(&records)?)
}

/// Build the generation prompt for `question` from the selected chunks.
pub fn compose_prompt(prompts: &Prompts, question: &str, chunks: &[SelectedChunk]) -> Result<String> {
    let mut vars = HashMap::new();
    vars.insert("chunks".to_string(), format_context_for_prompt(chunks)?);
    vars.insert("question".to_string(), question.to_string());

    Ok(prompts.render_with_custom(&prompts.rag.user, &vars))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Chunk;

    fn selected(number: i64, title: &str, start: f64, end: f64, text: &str) -> SelectedChunk {
        SelectedChunk {
            row: 0,
            chunk: Chunk {
                number,
                title: title.to_string(),
                start,
                end,
                text: text.to_string(),
            },
            score: 0.9,
        }
    }

    #[test]
    fn test_records_keep_order_and_fields() {
        let chunks = vec![
            selected(12, "Flexbox", 30.0, 45.5, "justify-content aligns items"),
            selected(3, "HTML forms", 0.0, 12.0, "the form tag"),
        ];

        let json = format_context_for_prompt(&chunks).unwrap();
        assert_eq!(
            json,
            r#"[{"title":"Flexbox","number":12,"start":30.0,"end":45.5,"text":"justify-content aligns items"},{"title":"HTML forms","number":3,"start":0.0,"end":12.0,"text":"the form tag"}]"#
        );
    }

    #[test]
    fn test_compose_prompt_layout() {
        let chunks = vec![selected(7, "CSS Grid", 100.0, 130.0, "grid-template-areas")];
        let prompt = compose_prompt(&Prompts::default(), "Where is grid explained?", &chunks).unwrap();

        assert!(prompt.starts_with(
            "I am teaching web development in my Sigma WDT course. Here are subtitle chunks containing:"
        ));
        let records = prompt.find(r#"[{"title":"CSS Grid""#).unwrap();
        let separator = prompt.find("---------------------------------").unwrap();
        let question = prompt.find(r#"User asked: "Where is grid explained?""#).unwrap();
        let closing = prompt.find("you can only answer questions related to the video content").unwrap();
        assert!(records < separator && separator < question && question < closing);
    }

    #[test]
    fn test_question_is_literal() {
        let prompt = compose_prompt(&Prompts::default(), "What does {{chunks}} mean?", &[]).unwrap();
        assert!(prompt.contains(r#"User asked: "What does {{chunks}} mean?""#));
        assert!(prompt.contains("\n[]\n"));
    }
}
