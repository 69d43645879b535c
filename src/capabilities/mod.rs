// src/capabilities/mod.rs
//! Clients for the external capabilities the core depends on: an LLM chat
//! service and an embedding service. Both are explicitly constructed and
//! injected into the components that need them; there is no global client
//! state.

pub mod embedding;
pub mod llm;

pub use embedding::EmbeddingClient;
pub use llm::OllamaClient;

use crate::error::CoreError;

/// Map a transport-level reqwest failure onto the core taxonomy. Timeouts
/// and unreachable hosts are reported distinctly; anything else surfaces as
/// an availability problem with the underlying detail attached.
pub(crate) fn transport_error(capability: &'static str, err: reqwest::Error) -> CoreError {
    if err.is_timeout() {
        CoreError::CapabilityTimeout { capability }
    } else {
        CoreError::CapabilityUnavailable {
            capability,
            detail: err.to_string(),
        }
    }
}

/// Bounded preview of a response body for error details and logs.
pub(crate) fn body_preview(body: &str) -> String {
    body.chars().take(500).collect()
}
