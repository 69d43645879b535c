// src/document.rs
//! Input and output document types. Raw text arrives from the ingestion
//! collaborator; the core never does file parsing itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::tailoring::formatter::FormattedDocument;

/// Plain text plus an opaque source identifier. Immutable once extracted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextDocument {
    pub raw_text: String,
    pub source_id: String,
}

impl TextDocument {
    pub fn new(source_id: impl Into<String>, raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
            source_id: source_id.into(),
        }
    }
}

/// A generated tailored CV: the raw markup the model produced, the
/// deterministic formatted rendering of it, and the stable generation id.
#[derive(Debug, Clone, Serialize)]
pub struct TailoredCv {
    pub generated_id: String,
    pub similarity: f64,
    pub content: String,
    pub document: FormattedDocument,
    pub created_at: DateTime<Utc>,
}

const SNIPPET_CHARS: usize = 300;

impl TailoredCv {
    /// Short preview of the generated content for status responses.
    pub fn snippet(&self) -> String {
        if self.content.chars().count() <= SNIPPET_CHARS {
            return self.content.clone();
        }
        let preview: String = self.content.chars().take(SNIPPET_CHARS).collect();
        format!("{preview}...")
    }
}
