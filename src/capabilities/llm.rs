// src/capabilities/llm.rs
//! Ollama chat client.
//!
//! Responses are decoded through an explicit ordered fallback chain rather
//! than nested error handling: try the whole body as one JSON document,
//! then scan line by line preferring a line that carries a `message` or
//! `response` field, else take the first parseable line. The surviving
//! value must expose its completion under one of those two fields.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};

use super::{body_preview, transport_error};
use crate::error::CoreError;

pub const CAPABILITY: &str = "Ollama";

const CHAT_ENDPOINT: &str = "/api/chat";

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
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

    /// Send a non-streaming chat request and return the completion text.
    pub async fn chat(&self, system: &str, user: &str) -> Result<String, CoreError> {
        let url = format!("{}{}", self.base_url, CHAT_ENDPOINT);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            stream: false,
        };

        info!(
            "Calling Ollama chat at {} ({} prompt chars)",
            url,
            user.chars().count()
        );

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
            let detail = upstream_error_detail(&body);
            error!("Ollama returned HTTP {}: {}", status, detail);
            return Err(CoreError::UpstreamStatus {
                capability: CAPABILITY,
                status: status.as_u16(),
                detail,
            });
        }

        let payload = decode_chat_payload(&body)?;
        let content = extract_content(&payload)?;

        if content.trim().is_empty() {
            warn!("Ollama returned an empty completion");
            return Err(CoreError::EmptyResponse {
                capability: CAPABILITY,
            });
        }

        Ok(content)
    }
}

/// Decode a chat response body. First attempt: the whole body as a single
/// JSON document. Fallback: scan lines, preferring one with a `message` or
/// `response` field, else the first line that parses at all.
pub fn decode_chat_payload(body: &str) -> Result<Value, CoreError> {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        return Ok(value);
    }

    warn!("Chat payload is not a single JSON document, scanning lines");

    let mut first_parseable: Option<Value> = None;
    for line in body.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Ok(value) = serde_json::from_str::<Value>(line) {
            if value.get("message").is_some() || value.get("response").is_some() {
                return Ok(value);
            }
            if first_parseable.is_none() {
                first_parseable = Some(value);
            }
        }
    }

    first_parseable.ok_or_else(|| CoreError::MalformedResponse {
        capability: CAPABILITY,
        detail: format!("no parseable JSON in response: {}", body_preview(body)),
    })
}

/// Pull the completion text out of a decoded chat payload.
pub fn extract_content(payload: &Value) -> Result<String, CoreError> {
    if let Some(message) = payload.get("message") {
        return Ok(message
            .get("content")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string());
    }
    if let Some(response) = payload.get("response") {
        return Ok(response.as_str().unwrap_or_default().to_string());
    }

    warn!("Unexpected chat payload shape: {}", payload);
    Err(CoreError::UnexpectedShape {
        capability: CAPABILITY,
    })
}

/// Strip a fenced code block wrapper (```, ```json) from LLM output,
/// leaving the inner payload. Content without a fence passes through
/// trimmed.
pub fn strip_code_fence(content: &str) -> String {
    let trimmed = content.trim();
    if trimmed.starts_with("```") {
        let lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() > 2 {
            return lines[1..lines.len() - 1].join("\n");
        }
    }
    trimmed.to_string()
}

/// Prefer the `error` field of an upstream error body when present.
fn upstream_error_detail(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body_preview(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(url: &str) -> OllamaClient {
        OllamaClient::new(url.to_string(), "test-model".to_string(), Duration::from_secs(5))
            .unwrap()
    }

    #[test]
    fn test_decode_whole_body() {
        let payload = decode_chat_payload(r#"{"message": {"content": "hello"}}"#).unwrap();
        assert_eq!(extract_content(&payload).unwrap(), "hello");
    }

    #[test]
    fn test_decode_line_scan_prefers_message_field() {
        let body = "{\"foo\": 1}\n{\"response\": \"value\"}";
        let payload = decode_chat_payload(body).unwrap();
        assert_eq!(extract_content(&payload).unwrap(), "value");
    }

    #[test]
    fn test_decode_falls_back_to_first_parseable_line() {
        let body = "not json at all\n{\"foo\": 1}";
        let payload = decode_chat_payload(body).unwrap();
        assert_eq!(payload["foo"], 1);
        assert!(matches!(
            extract_content(&payload),
            Err(CoreError::UnexpectedShape { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = decode_chat_payload("not json\nstill not json").unwrap_err();
        assert!(matches!(err, CoreError::MalformedResponse { .. }));
    }

    #[test]
    fn test_extract_content_from_response_field() {
        let payload: Value = serde_json::from_str(r#"{"response": "plain"}"#).unwrap();
        assert_eq!(extract_content(&payload).unwrap(), "plain");
    }

    #[test]
    fn test_strip_code_fence() {
        let fenced = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_code_fence(fenced), "{\"key\": \"value\"}");

        let bare = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_code_fence(bare), "{\"key\": \"value\"}");

        let plain = "  {\"key\": \"value\"}  ";
        assert_eq!(strip_code_fence(plain), "{\"key\": \"value\"}");
    }

    #[tokio::test]
    async fn test_chat_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/chat")
            .with_status(200)
            .with_body(r#"{"message": {"role": "assistant", "content": "tailored text"}}"#)
            .create_async()
            .await;

        let content = client(&server.url()).chat("system", "user").await.unwrap();
        assert_eq!(content, "tailored text");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_chat_upstream_status_uses_error_field() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/chat")
            .with_status(500)
            .with_body(r#"{"error": "model not loaded"}"#)
            .create_async()
            .await;

        let err = client(&server.url()).chat("s", "u").await.unwrap_err();
        match err {
            CoreError::UpstreamStatus { status, detail, .. } => {
                assert_eq!(status, 500);
                assert_eq!(detail, "model not loaded");
            }
            other => panic!("expected UpstreamStatus, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_chat_empty_completion() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/chat")
            .with_status(200)
            .with_body(r#"{"message": {"content": "  "}}"#)
            .create_async()
            .await;

        let err = client(&server.url()).chat("s", "u").await.unwrap_err();
        assert!(matches!(err, CoreError::EmptyResponse { .. }));
    }

    #[tokio::test]
    async fn test_chat_connection_failure() {
        let server = mockito::Server::new_async().await;
        let url = server.url();
        drop(server);

        let err = client(&url).chat("s", "u").await.unwrap_err();
        assert!(matches!(err, CoreError::CapabilityUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_chat_timeout() {
        // A server that accepts connections but never responds forces the
        // client-side timeout, which must surface as CapabilityTimeout,
        // not CapabilityUnavailable.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let client = OllamaClient::new(
            format!("http://{addr}"),
            "test-model".to_string(),
            Duration::from_millis(200),
        )
        .unwrap();

        let err = client.chat("s", "u").await.unwrap_err();
        assert!(matches!(err, CoreError::CapabilityTimeout { .. }));
    }

    #[tokio::test]
    async fn test_chat_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/chat")
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let err = client(&server.url()).chat("s", "u").await.unwrap_err();
        assert!(matches!(err, CoreError::MalformedResponse { .. }));
    }
}
