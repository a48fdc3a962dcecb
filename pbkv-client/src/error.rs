//! Client error types.

use pbkv_protocol::message::ErrorResponse;
use pbkv_protocol::ProtocolError;
use std::collections::HashMap;
use thiserror::Error;

/// Message substituted when the server reports a failure without one.
pub const DEFAULT_ERROR_MESSAGE: &str = "failed";

/// A failure reported by the server in an Error frame.
///
/// Always aborts the in-flight operation; callers may catch it, but this
/// layer never retries.
#[derive(Debug, Error)]
#[error("{operation} failed with server error {code}: {message}")]
pub struct ServerError {
    /// Operation that was in flight when the server reported the failure.
    pub operation: &'static str,
    /// Expected-outcome placeholder, kept for parity with transport faults.
    pub expected: &'static str,
    /// Numeric server error code; 0 when the server omitted it.
    pub code: u32,
    /// Reserved; this protocol carries no per-response headers.
    pub headers: HashMap<String, String>,
    /// Server-provided message, or the fixed fallback.
    pub message: String,
}

impl ServerError {
    pub fn from_response(operation: &'static str, response: ErrorResponse) -> Self {
        Self {
            operation,
            expected: "ok",
            code: response.errcode.unwrap_or(0),
            headers: HashMap::new(),
            message: response
                .errmsg
                .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string()),
        }
    }
}

/// Client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("connection closed")]
    ConnectionClosed,

    #[error("connect timeout")]
    ConnectTimeout,

    #[error(transparent)]
    Server(#[from] ServerError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_defaults() {
        let err = ServerError::from_response("fetch", ErrorResponse::default());
        assert_eq!(err.operation, "fetch");
        assert_eq!(err.expected, "ok");
        assert_eq!(err.code, 0);
        assert!(err.headers.is_empty());
        assert_eq!(err.message, DEFAULT_ERROR_MESSAGE);
    }

    #[test]
    fn test_server_error_carries_wire_fields() {
        let err = ServerError::from_response(
            "store",
            ErrorResponse {
                errmsg: Some("too_many_fails".to_string()),
                errcode: Some(4),
            },
        );
        assert_eq!(err.code, 4);
        assert_eq!(err.message, "too_many_fails");
        assert!(err.to_string().contains("store"));
        assert!(err.to_string().contains("too_many_fails"));
    }
}
