// src/config.rs
//! Environment-driven configuration for the matching core.

use std::time::Duration;

use crate::capabilities::{EmbeddingClient, OllamaClient};
use crate::error::CoreError;

const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
const DEFAULT_CHAT_MODEL: &str = "llama3.1";
const DEFAULT_EMBEDDING_MODEL: &str = "nomic-embed-text";

// Embeddings come back in seconds; LLM completions can take minutes.
const DEFAULT_EMBEDDING_TIMEOUT_SECS: u64 = 60;
const DEFAULT_EXTRACTION_TIMEOUT_SECS: u64 = 300;
const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 500;

#[derive(Debug, Clone)]
pub struct CoreConfig {
    pub ollama_url: String,
    pub chat_model: String,
    pub embedding_model: String,
    pub embedding_timeout: Duration,
    pub extraction_timeout: Duration,
    pub generation_timeout: Duration,
}

impl CoreConfig {
    /// Load configuration from the environment, falling back to defaults
    /// for anything unset.
    pub fn from_env() -> Self {
        Self {
            ollama_url: env_or("OLLAMA_API_URL", DEFAULT_OLLAMA_URL),
            chat_model: env_or("OLLAMA_MODEL", DEFAULT_CHAT_MODEL),
            embedding_model: env_or("EMBEDDING_MODEL", DEFAULT_EMBEDDING_MODEL),
            embedding_timeout: env_secs("EMBEDDING_TIMEOUT_SECS", DEFAULT_EMBEDDING_TIMEOUT_SECS),
            extraction_timeout: env_secs("EXTRACTION_TIMEOUT_SECS", DEFAULT_EXTRACTION_TIMEOUT_SECS),
            generation_timeout: env_secs("GENERATION_TIMEOUT_SECS", DEFAULT_GENERATION_TIMEOUT_SECS),
        }
    }

    /// Chat client with the extraction timeout (used for NER).
    pub fn extraction_client(&self) -> Result<OllamaClient, CoreError> {
        OllamaClient::new(
            self.ollama_url.clone(),
            self.chat_model.clone(),
            self.extraction_timeout,
        )
    }

    /// Chat client with the longer generation timeout (used for tailoring).
    pub fn generation_client(&self) -> Result<OllamaClient, CoreError> {
        OllamaClient::new(
            self.ollama_url.clone(),
            self.chat_model.clone(),
            self.generation_timeout,
        )
    }

    pub fn embedding_client(&self) -> Result<EmbeddingClient, CoreError> {
        EmbeddingClient::new(
            self.ollama_url.clone(),
            self.embedding_model.clone(),
            self.embedding_timeout,
        )
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_secs(key: &str, default: u64) -> Duration {
    let secs = std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default);
    Duration::from_secs(secs)
}
