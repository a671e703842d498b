//! Error handling for the workhub gateway.
//!
//! The gateway has a deliberately flat error surface: apart from the
//! authentication gate (which answers 401 with a plain-text body, see
//! [`crate::middleware::basic_auth`]), every failure a handler can produce is
//! answered with HTTP 500 and the uniform `{"error": "<message>"}` envelope.
//! Malformed pagination and path parameters go through the same envelope
//! rather than a 400; dashboard clients only distinguish "worked" from
//! "didn't".

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// A specialized Result type for gateway operations.
pub type Result<T> = std::result::Result<T, WorkhubError>;

/// The main error type for the workhub gateway.
#[derive(Debug, Error)]
pub enum WorkhubError {
    /// A request parameter (page number, dead-job timestamp) failed to parse.
    #[error("{0}")]
    Parse(String),

    /// The job store reported a failure. The message is surfaced verbatim.
    #[error("{0}")]
    Store(String),

    /// A successful payload failed to serialize.
    #[error("{0}")]
    Encode(#[from] serde_json::Error),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Socket-level failure while binding or serving.
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl From<redis::RedisError> for WorkhubError {
    fn from(err: redis::RedisError) -> Self {
        Self::Store(err.to_string())
    }
}

impl From<std::num::ParseIntError> for WorkhubError {
    fn from(err: std::num::ParseIntError) -> Self {
        Self::Parse(err.to_string())
    }
}

impl IntoResponse for WorkhubError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "request failed");

        // The envelope is assembled by interpolation so the message reaches
        // the client byte-for-byte as produced; quotes inside the message are
        // not escaped.
        let body = format!(r#"{{"error": "{}"}}"#, self);
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_surface_verbatim() {
        let err = WorkhubError::Store("connection refused".to_string());
        assert_eq!(err.to_string(), "connection refused");
    }

    #[test]
    fn parse_int_error_converts_to_parse() {
        let err: WorkhubError = "abc".parse::<i64>().unwrap_err().into();
        assert!(matches!(err, WorkhubError::Parse(_)));
    }

    #[tokio::test]
    async fn error_response_is_500_with_envelope() {
        let response = WorkhubError::Store("connection refused".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&bytes[..], br#"{"error": "connection refused"}"#);
    }
}
