// src/analysis/similarity.rs
//! Semantic similarity between two texts via embedding vectors.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::round4;
use crate::capabilities::EmbeddingClient;
use crate::error::CoreError;

static WHITESPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));
static UNSAFE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s.,;!?-]").expect("valid regex"));

/// Embedding input is truncated to bound the cost of a single call.
const MAX_EMBED_CHARS: usize = 3000;

/// Collapse whitespace runs, strip characters outside the safe punctuation
/// set, and truncate to the embedding length budget.
pub fn preprocess(text: &str) -> String {
    let collapsed = WHITESPACE_RUNS.replace_all(text, " ");
    let cleaned = UNSAFE_CHARS.replace_all(&collapsed, "");
    cleaned.trim().chars().take(MAX_EMBED_CHARS).collect()
}

/// Cosine similarity of two vectors. Vectors are not assumed pre-normalized.
/// A zero-norm vector yields 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| f64::from(*x) * f64::from(*y)).sum();
    let norm_a: f64 = a.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Computes embedding-based similarity scores. Holds the injected embedding
/// client; vectors are recomputed on every call, never cached.
pub struct SimilarityScorer {
    embedder: EmbeddingClient,
}

impl SimilarityScorer {
    pub fn new(embedder: EmbeddingClient) -> Self {
        Self { embedder }
    }

    /// Similarity between two texts in [0, 1], rounded to 4 decimals.
    pub async fn compute_similarity(
        &self,
        text_a: &str,
        text_b: &str,
    ) -> Result<f64, CoreError> {
        let text_a = preprocess(text_a);
        let text_b = preprocess(text_b);

        let vector_a = self.embedder.embed(&text_a).await?;
        let vector_b = self.embedder.embed(&text_b).await?;

        let similarity = round4(cosine_similarity(&vector_a, &vector_b)).clamp(0.0, 1.0);
        debug!("Computed similarity {}", similarity);
        Ok(similarity)
    }
}
