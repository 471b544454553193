//! In-memory corpus of transcript chunks.
//!
//! The corpus is loaded once from a snapshot and never mutated afterwards.
//! Embeddings live in a dense row-major matrix with precomputed norms so the
//! ranker can scan them without per-query conversion.

mod snapshot;

pub use snapshot::{load, ChunkRecord};

use crate::error::{Result, VeilederError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One transcript segment of a course video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Video number within the course.
    pub number: i64,
    /// Video title.
    pub title: String,
    /// Start of the segment (seconds).
    pub start: f64,
    /// End of the segment (seconds, exclusive).
    pub end: f64,
    /// Transcript text.
    pub text: String,
}

impl Chunk {
    /// Format the start time for display.
    pub fn format_timestamp(&self) -> String {
        format_seconds(self.start)
    }

    /// Whole-second range, e.g. `"12s - 95s"`.
    pub fn time_range(&self) -> String {
        format!("{}s - {}s", self.start as u64, self.end as u64)
    }
}

fn format_seconds(seconds: f64) -> String {
    let total_seconds = seconds as u32;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

/// Summary of a loaded corpus.
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusStats {
    pub chunks: usize,
    pub dimension: usize,
    pub videos: usize,
}

/// Read-only table of chunks and their embeddings.
#[derive(Debug)]
pub struct Corpus {
    chunks: Vec<Chunk>,
    matrix: Vec<f32>,
    norms: Vec<f64>,
    dimension: usize,
}

impl Corpus {
    /// Build a corpus from snapshot records, validating every row.
    pub fn from_records(records: Vec<ChunkRecord>) -> Result<Self> {
        let dimension = match records.first() {
            Some(first) => first.embedding.len(),
            None => return Err(VeilederError::StoreLoad("snapshot contains no chunks".to_string())),
        };
        if dimension == 0 {
            return Err(VeilederError::StoreLoad("row 0 has an empty embedding".to_string()));
        }

        let mut chunks = Vec::with_capacity(records.len());
        let mut matrix = Vec::with_capacity(records.len() * dimension);
        let mut norms = Vec::with_capacity(records.len());

        for (row, record) in records.into_iter().enumerate() {
            record.validate(row, dimension)?;
            let norm = crate::ranking::norm(&record.embedding);
            matrix.extend_from_slice(&record.embedding);
            norms.push(norm);
            chunks.push(record.into_chunk());
        }

        Ok(Self {
            chunks,
            matrix,
            norms,
            dimension,
        })
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Embedding dimension shared by every row.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn chunk(&self, row: usize) -> Option<&Chunk> {
        self.chunks.get(row)
    }

    /// Embedding of a single row.
    pub fn embedding(&self, row: usize) -> Option<&[f32]> {
        if row >= self.len() {
            return None;
        }
        let offset = row * self.dimension;
        Some(&self.matrix[offset..offset + self.dimension])
    }

    /// All embeddings in row order.
    pub fn all_embeddings(&self) -> impl Iterator<Item = &[f32]> + '_ {
        self.matrix.chunks_exact(self.dimension)
    }

    /// L2 norms of the embeddings, aligned with row order.
    pub fn norms(&self) -> &[f64] {
        &self.norms
    }

    pub fn stats(&self) -> CorpusStats {
        let videos: HashSet<i64> = self.chunks.iter().map(|c| c.number).collect();
        CorpusStats {
            chunks: self.len(),
            dimension: self.dimension,
            videos: videos.len(),
        }
    }
}

#[cfg(test)]
pub(crate) fn record(number: i64, start: f64, embedding: Vec<f32>) -> ChunkRecord {
    ChunkRecord {
        number,
        title: format!("Video {}", number),
        start,
        end: start + 10.0,
        text: format!("chunk at {}", start),
        embedding,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_records_builds_dense_matrix() {
        let corpus = Corpus::from_records(vec![
            record(1, 0.0, vec![3.0, 4.0]),
            record(1, 10.0, vec![0.0, 1.0]),
            record(2, 0.0, vec![1.0, 0.0]),
        ])
        .unwrap();

        assert_eq!(corpus.len(), 3);
        assert_eq!(corpus.dimension(), 2);
        assert_eq!(corpus.embedding(0), Some(&[3.0, 4.0][..]));
        assert_eq!(corpus.embedding(3), None);
        assert!((corpus.norms()[0] - 5.0).abs() < 1e-6);

        let rows: Vec<&[f32]> = corpus.all_embeddings().collect();
        let expected: Vec<&[f32]> = vec![&[3.0, 4.0][..], &[0.0, 1.0][..], &[1.0, 0.0][..]];
        assert_eq!(rows, expected);

        assert_eq!(
            corpus.stats(),
            CorpusStats {
                chunks: 3,
                dimension: 2,
                videos: 2
            }
        );
    }

    #[test]
    fn test_rejects_mixed_dimensions() {
        let err = Corpus::from_records(vec![
            record(1, 0.0, vec![1.0, 0.0]),
            record(1, 10.0, vec![1.0, 0.0, 0.0]),
        ])
        .unwrap_err();
        assert!(matches!(err, VeilederError::StoreLoad(_)));
    }

    #[test]
    fn test_rejects_empty_corpus() {
        let err = Corpus::from_records(Vec::new()).unwrap_err();
        assert!(matches!(err, VeilederError::StoreLoad(_)));
    }

    #[test]
    fn test_rejects_inverted_interval() {
        let mut bad = record(1, 20.0, vec![1.0]);
        bad.end = 5.0;
        let err = Corpus::from_records(vec![bad]).unwrap_err();
        assert!(matches!(err, VeilederError::StoreLoad(_)));
    }

    #[test]
    fn test_chunk_time_formatting() {
        let chunk = Chunk {
            number: 4,
            title: "Flexbox".to_string(),
            start: 125.4,
            end: 3725.9,
            text: String::new(),
        };
        assert_eq!(chunk.format_timestamp(), "02:05");
        assert_eq!(chunk.time_range(), "125s - 3725s");
        assert_eq!(format_seconds(3725.0), "01:02:05");
    }
}
