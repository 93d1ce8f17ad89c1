//! Error types for the chat API client.
//!
//! # Design
//! The status-code variants carry the `error` string from the response body
//! when the server sent one. Turning an `ApiError` into the sentence a user
//! sees is flow-specific ("Thread not found" vs "Message not found") and
//! happens in [`crate::mutation`] and [`crate::loader`].

use thiserror::Error;

/// Errors produced while building requests or interpreting responses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// A required form field was missing or only whitespace. Raised before
    /// any request is built.
    #[error("{label} cannot be empty")]
    EmptyInput { label: &'static str },

    /// 400 from the server.
    #[error("validation failed: {}", .message.as_deref().unwrap_or("invalid input"))]
    ValidationError { message: Option<String> },

    /// 403 from the server, e.g. editing a bot message.
    #[error("forbidden: {}", .message.as_deref().unwrap_or("operation not allowed"))]
    Forbidden { message: Option<String> },

    /// 404 from the server.
    #[error("resource not found")]
    NotFound,

    /// Any other non-2xx status.
    #[error("unexpected status {status}")]
    UnexpectedStatus { status: u16, body: String },

    /// The request never produced a response.
    #[error("{0}")]
    TransportError(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    /// HTTP status behind this error, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::ValidationError { .. } => Some(400),
            ApiError::Forbidden { .. } => Some(403),
            ApiError::NotFound => Some(404),
            ApiError::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_reads_as_a_sentence() {
        let err = ApiError::EmptyInput { label: "Title" };
        assert_eq!(err.to_string(), "Title cannot be empty");
    }

    #[test]
    fn status_is_reported_for_http_variants_only() {
        assert_eq!(ApiError::NotFound.status(), Some(404));
        assert_eq!(
            ApiError::UnexpectedStatus { status: 502, body: String::new() }.status(),
            Some(502)
        );
        assert_eq!(ApiError::TransportError("refused".into()).status(), None);
    }
}
