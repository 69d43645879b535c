// src/capabilities/embedding.rs
//! Embedding service client. One vector per call; vectors are never cached
//! across requests.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{error, trace};

use super::{body_preview, transport_error};
use crate::error::CoreError;

pub const CAPABILITY: &str = "embedding service";

const EMBEDDINGS_ENDPOINT: &str = "/api/embeddings";

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

pub struct EmbeddingClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl EmbeddingClient {
    pub fn new(base_url: String, model: String, timeout: Duration) -> Result<Self, CoreError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CoreError::CapabilityUnavailable {
                capability: CAPABILITY,
                detail: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url,
            model,
        })
    }

    /// Embed a single text, returning a fixed-length vector. Deterministic
    /// for identical input and model configuration; empty text is handled
    /// by the service, not special-cased here.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>, CoreError> {
        let url = format!("{}{}", self.base_url, EMBEDDINGS_ENDPOINT);
        let request = EmbeddingRequest {
            model: &self.model,
            prompt: text,
        };

        trace!("Embedding {} chars via {}", text.chars().count(), url);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error(CAPABILITY, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(CAPABILITY, e))?;

        if !status.is_success() {
            error!("Embedding service returned HTTP {}", status);
            return Err(CoreError::UpstreamStatus {
                capability: CAPABILITY,
                status: status.as_u16(),
                detail: body_preview(&body),
            });
        }

        let parsed: EmbeddingResponse =
            serde_json::from_str(&body).map_err(|e| CoreError::MalformedResponse {
                capability: CAPABILITY,
                detail: format!("{e}: {}", body_preview(&body)),
            })?;

        Ok(parsed.embedding)
    }
}
