// src/analysis/mod.rs
//! Lexical and semantic matching between a CV and a job description.

pub mod keywords;
pub mod matcher;
pub mod similarity;

pub use matcher::{MatchAnalysis, MatchAnalyzer, MatchLevel};
pub use similarity::SimilarityScorer;

/// Scores are reported at a fixed precision so comparisons are reproducible.
pub(crate) fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
