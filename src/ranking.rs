//! Exact cosine-similarity ranking over the corpus.

use crate::corpus::Corpus;
use crate::error::{Result, VeilederError};
use std::cmp::Ordering;
use tracing::debug;

/// A corpus row and its similarity to the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ranked {
    pub row: usize,
    pub score: f32,
}

/// Rank every corpus row against `query` and keep the best `k`.
///
/// Results are ordered by descending score; equal scores keep row order.
/// `k` larger than the corpus is clamped to the corpus size.
pub fn rank(query: &[f32], corpus: &Corpus, k: usize) -> Result<Vec<Ranked>> {
    if k == 0 {
        return Err(VeilederError::InvalidInput(
            "result count must be at least 1".to_string(),
        ));
    }
    if query.len() != corpus.dimension() {
        return Err(VeilederError::DimensionMismatch {
            expected: corpus.dimension(),
            actual: query.len(),
        });
    }

    let query_norm = norm(query);
    let mut ranked: Vec<Ranked> = corpus
        .all_embeddings()
        .zip(corpus.norms())
        .enumerate()
        .map(|(row, (embedding, &row_norm))| Ranked {
            row,
            score: cosine_with_norms(query, query_norm, embedding, row_norm),
        })
        .collect();

    // sort_by is stable, so ties stay in row order
    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    ranked.truncate(k.min(corpus.len()));

    debug!(
        "Ranked {} rows, kept {} (best score {:.4})",
        corpus.len(),
        ranked.len(),
        ranked.first().map(|r| r.score).unwrap_or_default()
    );

    Ok(ranked)
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    cosine_with_norms(a, norm(a), b, norm(b))
}

/// L2 norm, accumulated in f64 so large components don't overflow.
pub(crate) fn norm(v: &[f32]) -> f64 {
    v.iter().map(|&x| f64::from(x) * f64::from(x)).sum::<f64>().sqrt()
}

fn cosine_with_norms(a: &[f32], norm_a: f64, b: &[f32], norm_b: f64) -> f32 {
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    let dot_product: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(&x, &y)| f64::from(x) * f64::from(y))
        .sum();
    (dot_product / (norm_a * norm_b)) as f32
}
