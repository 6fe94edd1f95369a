pub mod client;
pub mod encode;
pub mod retry;
pub mod transport;
pub mod types;

pub use client::*;
pub use transport::{DocumentTransport, HttpTransport, MockTransport, RawResponse, TransportError};
pub use types::*;

use serde_json::Value;
use thiserror::Error;

use crate::schema::SchemaError;

/// Why the API refused a request, classified from the HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    PayloadTooLarge,
    Unprocessable,
    RateLimited,
    ServerError,
    Other,
}

impl RejectionKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => RejectionKind::BadRequest,
            401 => RejectionKind::Unauthorized,
            403 => RejectionKind::Forbidden,
            404 => RejectionKind::NotFound,
            413 => RejectionKind::PayloadTooLarge,
            422 => RejectionKind::Unprocessable,
            429 => RejectionKind::RateLimited,
            500..=599 => RejectionKind::ServerError,
            _ => RejectionKind::Other,
        }
    }
}

impl std::fmt::Display for RejectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadRequest => write!(f, "Bad request"),
            Self::Unauthorized => write!(f, "Unauthorized: invalid or expired API key"),
            Self::Forbidden => write!(f, "Forbidden: insufficient permissions"),
            Self::NotFound => write!(f, "Endpoint not found"),
            Self::PayloadTooLarge => write!(f, "Payload too large"),
            Self::Unprocessable => write!(f, "Unprocessable document"),
            Self::RateLimited => write!(f, "Rate limit exceeded"),
            Self::ServerError => write!(f, "Server error"),
            Self::Other => write!(f, "Request failed"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("File size ({actual_mb:.1}MB) exceeds the {limit_mb}MB limit")]
    FileTooLarge { actual_mb: f64, limit_mb: u64 },

    #[error("Request timed out after {0}s; the server took too long to respond")]
    RequestTimedOut(u64),

    #[error("Network unreachable: {0}")]
    NetworkUnreachable(String),

    /// 504s persisted through the whole retry budget. Distinct from a single
    /// gateway timeout, which is never surfaced on its own, since it is always
    /// retried first.
    #[error("Gateway timeout (504) persisted through {attempts} attempts; the document may be too complex for the current load")]
    RepeatedGatewayTimeout { attempts: u32 },

    #[error("{kind} (status {status}): {message}")]
    Rejected {
        kind: RejectionKind,
        status: u16,
        message: String,
    },

    #[error("Invalid response format from API: {0}")]
    InvalidResponse(String),

    #[error("Generated schema is not valid JSON: {0}")]
    GeneratedSchemaInvalid(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Longest rejection message shown to the user; API error bodies can run to
/// pages of HTML.
const MAX_REJECTION_MESSAGE: usize = 300;

/// Classify a non-2xx, non-504 response into a terminal error.
pub(crate) fn rejected(status: u16, body: &str) -> ApiError {
    ApiError::Rejected {
        kind: RejectionKind::from_status(status),
        status,
        message: rejection_message(body),
    }
}

/// Pull a human-readable message out of an error body: `error.message`,
/// then `message`, then the raw text, truncated.
fn rejection_message(body: &str) -> String {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            let nested = v
                .get("error")
                .and_then(|e| e.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string);
            nested.or_else(|| v.get("message").and_then(Value::as_str).map(str::to_string))
        })
        .unwrap_or_else(|| body.to_string());

    if message.chars().count() > MAX_REJECTION_MESSAGE {
        let truncated: String = message.chars().take(MAX_REJECTION_MESSAGE).collect();
        format!("{truncated}...")
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_classify_to_kinds() {
        assert_eq!(RejectionKind::from_status(401), RejectionKind::Unauthorized);
        assert_eq!(RejectionKind::from_status(413), RejectionKind::PayloadTooLarge);
        assert_eq!(RejectionKind::from_status(429), RejectionKind::RateLimited);
        assert_eq!(RejectionKind::from_status(500), RejectionKind::ServerError);
        assert_eq!(RejectionKind::from_status(503), RejectionKind::ServerError);
        assert_eq!(RejectionKind::from_status(302), RejectionKind::Other);
    }

    #[test]
    fn rejection_message_prefers_nested_error() {
        let body = r#"{"error": {"message": "schema too large"}, "message": "outer"}"#;
        assert_eq!(rejection_message(body), "schema too large");
    }

    #[test]
    fn rejection_message_falls_back_to_flat_then_raw() {
        assert_eq!(rejection_message(r#"{"message": "nope"}"#), "nope");
        assert_eq!(rejection_message("plain text failure"), "plain text failure");
    }

    #[test]
    fn rejection_message_truncated_at_300_chars() {
        let body = "x".repeat(1000);
        let msg = rejection_message(&body);
        assert_eq!(msg.chars().count(), 303);
        assert!(msg.ends_with("..."));
    }

    #[test]
    fn rejected_error_renders_kind_and_status() {
        let err = rejected(401, "{}");
        let text = err.to_string();
        assert!(text.contains("Unauthorized"));
        assert!(text.contains("401"));
    }
}
