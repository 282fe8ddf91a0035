//! Error types for the expiration index and its HTTP glue
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Store Error Enum ==
/// Unified error type for the expiration store and the host glue.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The expiry queue could not accept a new event
    #[error("Insert failed: {0}")]
    InsertFailed(String),

    /// Key not found in the keyspace or the index
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Value outlived its fallback expiry
    #[error("Key expired: {0}")]
    Expired(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            StoreError::InsertFailed(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            StoreError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            StoreError::Expired(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            StoreError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            StoreError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the expiration store.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        let test_cases = vec![
            (StoreError::InsertFailed("oom".to_string()), StatusCode::SERVICE_UNAVAILABLE),
            (StoreError::NotFound("key".to_string()), StatusCode::NOT_FOUND),
            (StoreError::Expired("key".to_string()), StatusCode::NOT_FOUND),
            (StoreError::InvalidRequest("bad".to_string()), StatusCode::BAD_REQUEST),
            (StoreError::Internal("error".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected_status) in test_cases {
            let response = error.into_response();
            assert_eq!(response.status(), expected_status);
        }
    }

    #[test]
    fn test_error_display() {
        let err = StoreError::InsertFailed("queue full".to_string());
        assert_eq!(err.to_string(), "Insert failed: queue full");
    }
}
