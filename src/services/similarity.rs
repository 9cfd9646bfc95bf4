//! Similarity scoring and ranking
//!
//! Pure functions shared by the retriever and the ranking benchmark.

use crate::domain::models::{ScoredResult, VectorStoreEntry};

/// Cosine similarity between two vectors, clamped into `[-1, 1]`.
///
/// Vectors of different length or with zero magnitude score `0.0`.
/// Accumulates in `f64` to keep long vectors stable.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let (dot, norm_a, norm_b) = a.iter().zip(b.iter()).fold(
        (0.0f64, 0.0f64, 0.0f64),
        |(dot, na, nb), (&x, &y)| {
            let (x, y) = (f64::from(x), f64::from(y));
            (dot + x * y, na + x * x, nb + y * y)
        },
    );

    let magnitude = norm_a.sqrt() * norm_b.sqrt();
    if magnitude == 0.0 || !magnitude.is_finite() {
        return 0.0;
    }

    let similarity = (dot / magnitude).clamp(-1.0, 1.0);
    if similarity.is_nan() {
        0.0
    } else {
        similarity as f32
    }
}

/// Score every entry of a store against `query`, in corpus order.
pub fn score_entries(entries: &[VectorStoreEntry], query: &[f32]) -> Vec<ScoredResult> {
    entries
        .iter()
        .map(|entry| ScoredResult::new(entry.chunk.clone(), cosine_similarity(query, &entry.vector)))
        .collect()
}

/// Keep results strictly above `threshold`, best first, at most `top_n`.
///
/// The sort is stable so equal scores keep corpus order.
pub fn rank(mut results: Vec<ScoredResult>, threshold: f32, top_n: usize) -> Vec<ScoredResult> {
    results.retain(|r| r.similarity > threshold);
    results.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    results.truncate(top_n);
    results
}
