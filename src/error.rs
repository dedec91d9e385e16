//! Error types for the entity service
//!
//! Provides unified error handling using thiserror. The core keeps "not
//! found" and store failures distinct; the HTTP boundary collapses every
//! non-validation failure into an opaque 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::db::StoreError;
use crate::models::ErrorResponse;

// == Service Error Enum ==
/// Unified error type for the entity service.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Malformed or invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// No persisted entity carries this identifier
    #[error("Entity not found: {0}")]
    NotFound(i64),

    /// The persistent store failed
    #[error("Store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ServiceError::NotFound(id),
            other => ServiceError::Store(other),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServiceError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ServiceError::NotFound(_) | ServiceError::Store(_) => {
                error!(error = %self, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the entity service.
pub type Result<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        let test_cases = vec![
            (
                ServiceError::InvalidRequest("bad".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (ServiceError::NotFound(1), StatusCode::INTERNAL_SERVER_ERROR),
            (
                ServiceError::Store(StoreError::Unavailable("down".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected_status) in test_cases {
            let response = error.into_response();
            assert_eq!(response.status(), expected_status);
        }
    }

    #[test]
    fn test_store_not_found_lifts_to_not_found() {
        let err: ServiceError = StoreError::NotFound(42).into();
        assert!(matches!(err, ServiceError::NotFound(42)));

        let err: ServiceError = StoreError::Unavailable("down".to_string()).into();
        assert!(matches!(err, ServiceError::Store(_)));
    }

    #[tokio::test]
    async fn test_internal_error_body_is_opaque() {
        let response = ServiceError::Store(StoreError::Unavailable("secret dsn".to_string()))
            .into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(body.contains("Internal server error"));
        assert!(!body.contains("secret dsn"));
    }
}
