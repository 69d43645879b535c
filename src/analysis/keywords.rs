// src/analysis/keywords.rs
//! Frequency-based keyword extraction with a boost for domain vocabulary.
//! Pure string processing, no I/O.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

use super::round4;

/// Common stop words (French and English).
static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "le", "la", "les", "un", "une", "des", "de", "du", "et", "ou", "à", "pour", "dans", "sur",
        "avec", "par", "est", "sont", "être", "avoir", "faire", "peut", "doit", "sera", "été",
        "ce", "se", "que", "qui", "quoi", "comme", "mais", "donc", "car", "si", "ne", "pas",
        "plus", "très", "tout", "tous", "the", "a", "an", "and", "or", "but", "in", "on", "at",
        "to", "for", "of", "with", "by", "is", "are", "was", "were", "been", "have", "has", "had",
        "do", "does", "did", "will", "would", "could", "should", "may", "might", "can", "this",
        "that", "these", "those", "i", "you", "he", "she", "it", "we", "they", "me", "him", "her",
        "us", "them", "my", "your", "his", "its", "our", "their",
    ]
    .into_iter()
    .collect()
});

/// Technical and professional terms that get a 2x frequency boost.
static DOMAIN_TERMS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "python",
        "java",
        "javascript",
        "react",
        "vue",
        "angular",
        "node",
        "typescript",
        "php",
        "ruby",
        "rust",
        "sql",
        "mongodb",
        "mysql",
        "postgresql",
        "redis",
        "docker",
        "kubernetes",
        "aws",
        "azure",
        "gcp",
        "git",
        "agile",
        "scrum",
        "api",
        "rest",
        "graphql",
        "microservices",
        "devops",
        "analytics",
        "cloud",
        "frontend",
        "backend",
        "fullstack",
        "mobile",
        "ios",
        "android",
        "flutter",
        "management",
        "leadership",
        "project",
        "team",
        "communication",
        "collaboration",
        "analysis",
    ]
    .into_iter()
    .collect()
});

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s-]").expect("valid regex"));
static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w+(?:-\w+)*\b").expect("valid regex"));

const MIN_TOKEN_CHARS: usize = 4;

/// Extract up to `max_keywords` keywords from `text`, most important first.
///
/// Tokens are lowercased, stripped of punctuation except intra-word
/// hyphens, and scored by frequency; domain terms count double. Ties keep
/// first-seen order. Empty or stop-word-only input yields an empty list.
pub fn extract_keywords(text: &str, max_keywords: usize) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let lowered = text.to_lowercase();
    let cleaned = NON_WORD.replace_all(&lowered, " ");

    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, u64> = HashMap::new();

    for token in TOKEN.find_iter(&cleaned) {
        let token = token.as_str();
        if token.chars().count() < MIN_TOKEN_CHARS || STOP_WORDS.contains(token) {
            continue;
        }
        if !counts.contains_key(token) {
            order.push(token.to_string());
        }
        *counts.entry(token.to_string()).or_insert(0) += 1;
    }

    let mut scored: Vec<(&String, u64)> = order
        .iter()
        .map(|token| {
            let count = counts[token];
            let score = if DOMAIN_TERMS.contains(token.as_str()) {
                count * 2
            } else {
                count
            };
            (token, score)
        })
        .collect();

    // Stable sort keeps first-seen order among equal scores.
    scored.sort_by(|a, b| b.1.cmp(&a.1));

    scored
        .into_iter()
        .take(max_keywords)
        .map(|(token, _)| token.clone())
        .collect()
}

/// Case-insensitive intersection of two keyword lists, sorted.
pub fn find_common_keywords(cv_keywords: &[String], job_keywords: &[String]) -> Vec<String> {
    let cv_set: HashSet<String> = cv_keywords.iter().map(|k| k.to_lowercase()).collect();
    let job_set: HashSet<String> = job_keywords.iter().map(|k| k.to_lowercase()).collect();

    let mut common: Vec<String> = cv_set.intersection(&job_set).cloned().collect();
    common.sort();
    common
}

/// Share of job keywords covered by the CV, in [0, 1] at 4 decimals.
/// An empty job list is a defined edge case and yields 0.0.
pub fn keyword_coverage(cv_keywords: &[String], job_keywords: &[String]) -> f64 {
    if job_keywords.is_empty() {
        return 0.0;
    }

    let cv_set: HashSet<String> = cv_keywords.iter().map(|k| k.to_lowercase()).collect();
    let job_set: HashSet<String> = job_keywords.iter().map(|k| k.to_lowercase()).collect();
    let matched = cv_set.intersection(&job_set).count();

    round4(matched as f64 / job_set.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_extract_keywords_handles_empty_text() {
        assert!(extract_keywords("", 10).is_empty());
        assert!(extract_keywords("   \n\t ", 10).is_empty());
    }

    #[test]
    fn test_extract_keywords_filters_stop_words() {
        assert!(extract_keywords("and the or but in on", 10).is_empty());
    }

    #[test]
    fn test_extract_keywords_drops_short_tokens() {
        // "api" and "aws" are only three characters long.
        assert!(extract_keywords("api aws sql", 10).is_empty());
    }

    #[test]
    fn test_extract_keywords_prioritizes_domain_terms() {
        let text = "Python python leadership communication React analytics";
        let keywords = extract_keywords(text, 3);
        assert_eq!(keywords.len(), 3);
        assert_eq!(keywords[0], "python");
        assert!(keywords.contains(&"python".to_string()));
    }

    #[test]
    fn test_extract_keywords_limits_and_dedups() {
        let text = (0..20).map(|i| format!("skill{i}")).collect::<Vec<_>>().join(" ");
        let keywords = extract_keywords(&text, 5);
        assert_eq!(keywords.len(), 5);

        let repeated = extract_keywords("docker docker docker kubernetes", 10);
        assert_eq!(repeated, vec!["docker", "kubernetes"]);
    }

    #[test]
    fn test_extract_keywords_all_lowercase() {
        let keywords = extract_keywords("Senior ENGINEER built Microservices", 10);
        for keyword in &keywords {
            assert_eq!(keyword, &keyword.to_lowercase());
        }
    }

    #[test]
    fn test_extract_keywords_keeps_hyphenated_compounds() {
        let keywords = extract_keywords("full-stack development, full-stack delivery", 10);
        assert!(keywords.contains(&"full-stack".to_string()));
    }

    #[test]
    fn test_extract_keywords_tie_break_is_first_seen() {
        let keywords = extract_keywords("zebra apple zebra apple mango", 10);
        assert_eq!(keywords, vec!["zebra", "apple", "mango"]);
    }

    #[test]
    fn test_find_common_keywords_case_insensitive() {
        let result = find_common_keywords(&owned(&["Python", "FastAPI"]), &owned(&["python", "django"]));
        assert_eq!(result, vec!["python"]);
    }

    #[test]
    fn test_find_common_keywords_sorted() {
        let result = find_common_keywords(
            &owned(&["docker", "azure", "python"]),
            &owned(&["python", "docker", "azure"]),
        );
        assert_eq!(result, vec!["azure", "docker", "python"]);
    }

    #[test]
    fn test_keyword_coverage_full_match() {
        let coverage = keyword_coverage(&owned(&["python", "fastapi"]), &owned(&["FastAPI", "Python"]));
        assert_eq!(coverage, 1.0);
    }

    #[test]
    fn test_keyword_coverage_partial_match() {
        let coverage = keyword_coverage(&owned(&["python"]), &owned(&["python", "fastapi", "docker"]));
        assert_eq!(coverage, 0.3333);
    }

    #[test]
    fn test_keyword_coverage_empty_job_keywords() {
        assert_eq!(keyword_coverage(&owned(&["python"]), &[]), 0.0);
    }
}
