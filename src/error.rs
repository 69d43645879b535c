// src/error.rs
//! Error taxonomy shared by every component that talks to an external
//! capability. Timeouts, unreachable services, upstream HTTP errors and
//! undecodable payloads are kept distinct so callers can report the right
//! remediation to the end user.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// No text to process where text is required (e.g. tailoring).
    #[error("input text is empty")]
    InputEmpty,

    /// The capability did not respond within the configured timeout.
    #[error("{capability} request timed out")]
    CapabilityTimeout { capability: &'static str },

    /// The capability could not be reached at all.
    #[error("{capability} is unreachable: {detail}")]
    CapabilityUnavailable {
        capability: &'static str,
        detail: String,
    },

    /// The capability answered, but with an HTTP error status. Reported
    /// separately from connection failures.
    #[error("{capability} returned HTTP {status}: {detail}")]
    UpstreamStatus {
        capability: &'static str,
        status: u16,
        detail: String,
    },

    /// No parseable payload could be recovered from the response body.
    #[error("{capability} returned a malformed response: {detail}")]
    MalformedResponse {
        capability: &'static str,
        detail: String,
    },

    /// The payload decoded, but carries neither a `message` nor a
    /// `response` field.
    #[error("{capability} response has neither `message` nor `response` field")]
    UnexpectedShape { capability: &'static str },

    /// The payload decoded, but the completion text is blank.
    #[error("{capability} returned an empty completion")]
    EmptyResponse { capability: &'static str },
}

impl CoreError {
    /// Name of the capability involved, when the error came from one.
    pub fn capability(&self) -> Option<&'static str> {
        match self {
            CoreError::InputEmpty => None,
            CoreError::CapabilityTimeout { capability }
            | CoreError::CapabilityUnavailable { capability, .. }
            | CoreError::UpstreamStatus { capability, .. }
            | CoreError::MalformedResponse { capability, .. }
            | CoreError::UnexpectedShape { capability }
            | CoreError::EmptyResponse { capability } => Some(capability),
        }
    }
}
