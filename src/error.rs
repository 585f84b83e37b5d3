//! Unified SDK error types.

use crate::shared::Value;
use thiserror::Error;

/// Top-level SDK error.
///
/// Every failure that reaches application code carries a message, a resolved
/// HTTP status (0 when no response was received) and the original cause.
#[derive(Error, Debug)]
pub enum SdkError {
    /// The server answered with a non-success status. `cause` is the parsed
    /// (normalized) error body, `Value::Null` when the body was empty.
    #[error("{message}")]
    Api {
        message: String,
        status: u16,
        cause: Value,
    },

    /// No response reached us. `cause` is the transport error's text.
    #[error("{message}: {}", .cause.as_str().unwrap_or("unknown cause"))]
    Network { message: String, cause: Value },

    /// The caller cancelled the request.
    #[error("Request aborted: {}", .reason.as_str().unwrap_or("no reason given"))]
    Aborted { reason: Value },

    /// The per-call timeout fired.
    #[error("Request timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("SSE error: {0}")]
    Sse(#[from] SseError),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl SdkError {
    pub(crate) fn api(status: u16, cause: Value) -> Self {
        SdkError::Api {
            message: format!("HTTP {}", status),
            status,
            cause,
        }
    }

    pub(crate) fn network(cause: impl std::fmt::Display) -> Self {
        SdkError::Network {
            message: "Network error".to_string(),
            cause: Value::String(cause.to_string()),
        }
    }

    pub(crate) fn aborted(reason: impl Into<Value>) -> Self {
        SdkError::Aborted {
            reason: reason.into(),
        }
    }

    /// Resolved HTTP status, 0 for anything that never got a response.
    pub fn status(&self) -> u16 {
        match self {
            SdkError::Api { status, .. } => *status,
            _ => 0,
        }
    }

    /// What the failure carried: the parsed error body for API errors, the
    /// transport error for network failures, the reason for aborts.
    pub fn cause(&self) -> Option<&Value> {
        match self {
            SdkError::Api { cause, .. } | SdkError::Network { cause, .. } => Some(cause),
            SdkError::Aborted { reason } => Some(reason),
            _ => None,
        }
    }

    /// Cancellation and timeout. Never retried.
    pub fn is_abort(&self) -> bool {
        matches!(self, SdkError::Aborted { .. } | SdkError::Timeout { .. })
    }
}

/// SSE stream errors.
#[derive(Error, Debug)]
pub enum SseError {
    #[error("Not connected")]
    NotConnected,

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Stream id not known yet; wait for the initial message")]
    StreamIdUnknown,

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Stream closed: {0}")]
    Closed(String),
}
