/// Unified error types for the entity resolution service
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the service
#[derive(Error, Debug)]
pub enum ErsError {
    /// Malformed request: unrecognized identifier type or empty identifier.
    /// Raised before any directory call is made.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The directory backend is unreachable, rejected the call, or returned
    /// an unparsable response
    #[error("Upstream directory error: {0}")]
    Upstream(String),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Convert ErsError to HTTP response
impl IntoResponse for ErsError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ErsError::Validation(_) => (
                StatusCode::BAD_REQUEST,
                "InvalidRequest",
                self.to_string(),
            ),
            ErsError::Upstream(_) => (
                StatusCode::BAD_GATEWAY,
                "UpstreamUnavailable",
                self.to_string(),
            ),
            ErsError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "InternalServerError",
                "Internal server error".to_string(), // Don't leak details
            ),
        };

        crate::metrics::record_error(error_code);

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for service operations
pub type ErsResult<T> = Result<T, ErsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let resp = ErsError::Validation("bad type".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_upstream_maps_to_bad_gateway() {
        let resp = ErsError::Upstream("connection refused".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_internal_maps_to_server_error() {
        let resp = ErsError::Internal("boom".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
