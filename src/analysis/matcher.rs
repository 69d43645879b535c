// src/analysis/matcher.rs
//! Combines keyword coverage and semantic similarity into a single match
//! analysis with a qualitative tier.

use std::fmt;

use serde::Serialize;
use tracing::info;

use super::keywords::{extract_keywords, find_common_keywords, keyword_coverage};
use super::similarity::SimilarityScorer;
use crate::capabilities::EmbeddingClient;
use crate::error::CoreError;

/// Keywords considered per document when analyzing a match.
pub const DEFAULT_MAX_KEYWORDS: usize = 20;

/// Qualitative match tier derived from semantic similarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum MatchLevel {
    #[serde(rename = "Very Low")]
    VeryLow,
    Low,
    Medium,
    High,
}

impl MatchLevel {
    /// Thresholds are closed on the lower bound: 0.80 is High, 0.65 is
    /// Medium, 0.50 is Low.
    pub fn from_similarity(similarity: f64) -> Self {
        if similarity >= 0.80 {
            MatchLevel::High
        } else if similarity >= 0.65 {
            MatchLevel::Medium
        } else if similarity >= 0.50 {
            MatchLevel::Low
        } else {
            MatchLevel::VeryLow
        }
    }
}

impl fmt::Display for MatchLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MatchLevel::VeryLow => "Very Low",
            MatchLevel::Low => "Low",
            MatchLevel::Medium => "Medium",
            MatchLevel::High => "High",
        };
        write!(f, "{label}")
    }
}

/// Result of analyzing one CV against one job description. Recomputed on
/// every request; never persisted by the core.
#[derive(Debug, Clone, Serialize)]
pub struct MatchAnalysis {
    pub similarity: f64,
    pub match_level: MatchLevel,
    pub cv_keywords: Vec<String>,
    pub job_keywords: Vec<String>,
    pub common_keywords: Vec<String>,
    pub keyword_coverage: f64,
    pub keyword_match_count: usize,
    pub total_job_keywords: usize,
}

/// Pure composition of the keyword analyzer and the similarity scorer; its
/// only failure modes are theirs.
pub struct MatchAnalyzer {
    scorer: SimilarityScorer,
}

impl MatchAnalyzer {
    pub fn new(embedder: EmbeddingClient) -> Self {
        Self {
            scorer: SimilarityScorer::new(embedder),
        }
    }

    pub async fn analyze(&self, cv_text: &str, job_text: &str) -> Result<MatchAnalysis, CoreError> {
        let similarity = self.scorer.compute_similarity(cv_text, job_text).await?;

        let cv_keywords = extract_keywords(cv_text, DEFAULT_MAX_KEYWORDS);
        let job_keywords = extract_keywords(job_text, DEFAULT_MAX_KEYWORDS);
        let common_keywords = find_common_keywords(&cv_keywords, &job_keywords);
        let coverage = keyword_coverage(&cv_keywords, &job_keywords);

        let match_level = MatchLevel::from_similarity(similarity);
        info!(
            "Analyzed match: similarity {} ({}), {} of {} job keywords covered",
            similarity,
            match_level,
            common_keywords.len(),
            job_keywords.len()
        );

        Ok(MatchAnalysis {
            similarity,
            match_level,
            keyword_match_count: common_keywords.len(),
            total_job_keywords: job_keywords.len(),
            cv_keywords,
            job_keywords,
            common_keywords,
            keyword_coverage: coverage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_match_level_boundaries() {
        assert_eq!(MatchLevel::from_similarity(0.80), MatchLevel::High);
        assert_eq!(MatchLevel::from_similarity(0.7999), MatchLevel::Medium);
        assert_eq!(MatchLevel::from_similarity(0.65), MatchLevel::Medium);
        assert_eq!(MatchLevel::from_similarity(0.50), MatchLevel::Low);
        assert_eq!(MatchLevel::from_similarity(0.4999), MatchLevel::VeryLow);
        assert_eq!(MatchLevel::from_similarity(1.0), MatchLevel::High);
        assert_eq!(MatchLevel::from_similarity(0.0), MatchLevel::VeryLow);
    }

    #[test]
    fn test_match_level_display() {
        assert_eq!(MatchLevel::VeryLow.to_string(), "Very Low");
        assert_eq!(MatchLevel::High.to_string(), "High");
    }

    #[test]
    fn test_match_level_ordering() {
        assert!(MatchLevel::High > MatchLevel::Medium);
        assert!(MatchLevel::Medium > MatchLevel::Low);
        assert!(MatchLevel::Low > MatchLevel::VeryLow);
    }

    #[tokio::test]
    async fn test_analyze_overlapping_texts() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/embeddings")
            .with_status(200)
            .with_body(r#"{"embedding": [0.3, 0.8, 0.52]}"#)
            .expect(2)
            .create_async()
            .await;

        let embedder = EmbeddingClient::new(
            server.url(),
            "test-model".to_string(),
            Duration::from_secs(5),
        )
        .unwrap();
        let analyzer = MatchAnalyzer::new(embedder);

        let cv_text = "Senior Engineer with Python and cloud experience, \
                       leading engineer teams on python services.";
        let job_text = "Engineer wanted: Python, Cloud, engineer mindset.";
        let analysis = analyzer.analyze(cv_text, job_text).await.unwrap();

        // Identical embeddings, so similarity is reflexively 1.0.
        assert_eq!(analysis.similarity, 1.0);
        assert!(analysis.match_level >= MatchLevel::Medium);
        assert!(analysis.keyword_coverage > 0.0);
        assert!(analysis.common_keywords.contains(&"python".to_string()));
        assert_eq!(analysis.keyword_match_count, analysis.common_keywords.len());
        assert_eq!(analysis.total_job_keywords, analysis.job_keywords.len());
    }
}
