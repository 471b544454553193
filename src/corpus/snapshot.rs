//! Snapshot loading.
//!
//! A snapshot is either a JSON array of row objects (the layout pandas writes
//! with `to_json(orient="records")`) or JSON Lines with one row per line.
//! Unknown fields are ignored.

use super::{Chunk, Corpus};
use crate::error::{Result, VeilederError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, instrument};

/// A snapshot row as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkRecord {
    pub number: i64,
    pub title: String,
    pub start: f64,
    pub end: f64,
    pub text: String,
    pub embedding: Vec<f32>,
}

impl ChunkRecord {
    pub(super) fn validate(&self, row: usize, dimension: usize) -> Result<()> {
        if !(self.start >= 0.0 && self.start < self.end) {
            return Err(VeilederError::StoreLoad(format!(
                "row {} has an invalid time range: start={} end={}",
                row, self.start, self.end
            )));
        }
        if self.embedding.len() != dimension {
            return Err(VeilederError::StoreLoad(format!(
                "row {} has a {}-dimensional embedding, expected {}",
                row,
                self.embedding.len(),
                dimension
            )));
        }
        if self.embedding.iter().any(|x| !x.is_finite()) {
            return Err(VeilederError::StoreLoad(format!(
                "row {} has a non-finite embedding value",
                row
            )));
        }
        Ok(())
    }

    pub(super) fn into_chunk(self) -> Chunk {
        Chunk {
            number: self.number,
            title: self.title,
            start: self.start,
            end: self.end,
            text: self.text,
        }
    }
}

/// Load a corpus snapshot from disk.
#[instrument(skip(path), fields(path = %path.as_ref().display()))]
pub fn load(path: impl AsRef<Path>) -> Result<Corpus> {
    let path = path.as_ref();

    let content = std::fs::read_to_string(path)
        .map_err(|e| VeilederError::StoreLoad(format!("{}: {}", path.display(), e)))?;

    let records = if is_json_lines(path) {
        parse_json_lines(&content)?
    } else {
        serde_json::from_str::<Vec<ChunkRecord>>(&content)
            .map_err(|e| VeilederError::StoreLoad(format!("{}: {}", path.display(), e)))?
    };

    let corpus = Corpus::from_records(records)?;
    info!(
        "Loaded {} chunks ({} dimensions) from {}",
        corpus.len(),
        corpus.dimension(),
        path.display()
    );
    Ok(corpus)
}

fn is_json_lines(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("jsonl") | Some("ndjson")
    )
}

fn parse_json_lines(content: &str) -> Result<Vec<ChunkRecord>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line)
                .map_err(|e| VeilederError::StoreLoad(format!("line {}: {}", i + 1, e)))
        })
        .collect()
}
