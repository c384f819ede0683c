//! Response types for the attendance ledger API.
//!
//! This module defines the error response structures and the mapping from
//! [`LedgerError`] to HTTP status codes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<LedgerError> for ApiErrorResponse {
    fn from(error: LedgerError) -> Self {
        let message = error.to_string();
        let (status, error) = match error {
            LedgerError::EmptyInput { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::new("EMPTY_INPUT", message),
            ),
            LedgerError::UnknownBatch { .. } => (
                StatusCode::NOT_FOUND,
                ApiError::new("BATCH_NOT_FOUND", message),
            ),
            LedgerError::BatchDataMissing { .. } => (
                StatusCode::GONE,
                ApiError::with_details(
                    "BATCH_DATA_MISSING",
                    message,
                    "The batch is registered but its data is no longer available; upload it again",
                ),
            ),
            LedgerError::TypeMismatch { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::new("TYPE_MISMATCH", message),
            ),
            LedgerError::MissingColumns { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::new("MISSING_COLUMNS", message),
            ),
            LedgerError::InvalidPage { .. } | LedgerError::InvalidPageSize { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_PAGE", message),
            ),
            LedgerError::ConfigNotFound { path } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            ),
            LedgerError::ConfigParseError { path, message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            ),
            LedgerError::Export { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("EXPORT_ERROR", "Export failed", message),
            ),
        };
        ApiErrorResponse { status, error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BatchType;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_unknown_and_missing_batches_map_differently() {
        let unknown: ApiErrorResponse = LedgerError::UnknownBatch {
            batch_id: "b-1".to_string(),
        }
        .into();
        assert_eq!(unknown.status, StatusCode::NOT_FOUND);
        assert_eq!(unknown.error.code, "BATCH_NOT_FOUND");

        let missing: ApiErrorResponse = LedgerError::BatchDataMissing {
            batch_id: "b-1".to_string(),
        }
        .into();
        assert_eq!(missing.status, StatusCode::GONE);
        assert!(missing.error.details.is_some());
    }

    #[test]
    fn test_type_mismatch_is_bad_request() {
        let response: ApiErrorResponse = LedgerError::TypeMismatch {
            batch_id: "b-2".to_string(),
            expected: BatchType::Leave,
            actual: BatchType::Overtime,
        }
        .into();
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error.code, "TYPE_MISMATCH");
        assert!(response.error.message.contains("b-2"));
    }

    #[test]
    fn test_empty_input_is_unprocessable() {
        let response: ApiErrorResponse = LedgerError::EmptyInput {
            message: "no valid start time".to_string(),
        }
        .into();
        assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.error.code, "EMPTY_INPUT");
    }
}
