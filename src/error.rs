//! Service error types with HTTP status code mapping.
//!
//! [`PulseError`] is the central error type. Each variant maps to a specific
//! HTTP status code and structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1001,
///     "message": "invalid request: description must not be empty"
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status                  |
/// |-----------|-----------------|------------------------------|
/// | 1000–1999 | Validation      | 400 Bad Request              |
/// | 2000–2999 | Lookup          | 404 Not Found / 422          |
/// | 3000–3999 | Server          | 500 / 503                    |
#[derive(Debug, thiserror::Error)]
pub enum PulseError {
    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Update with the given ID was not found.
    #[error("update not found: {0}")]
    UpdateNotFound(uuid::Uuid),

    /// Place search found no match or the geocoder could not be reached.
    #[error("geocoding failed: {0}")]
    GeoLookupError(String),

    /// Device location was denied or failed.
    #[error("location unavailable: {0}")]
    LocationUnavailable(String),

    /// Store read, write, or delete failed.
    #[error("persistence error: {0}")]
    PersistenceError(String),

    /// AI summary call failed or is not configured.
    #[error("summary unavailable: {0}")]
    SummaryUnavailable(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),

    /// An environment setting is present but unusable.
    #[error("configuration error: {0}")]
    Config(String),
}

impl PulseError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::UpdateNotFound(_) => 2001,
            Self::GeoLookupError(_) => 2002,
            Self::LocationUnavailable(_) => 2003,
            Self::Internal(_) => 3000,
            Self::PersistenceError(_) => 3001,
            Self::SummaryUnavailable(_) => 3002,
            Self::Config(_) => 3003,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::UpdateNotFound(_) | Self::GeoLookupError(_) => StatusCode::NOT_FOUND,
            Self::LocationUnavailable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::PersistenceError(_) | Self::Internal(_) | Self::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::SummaryUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Builds the JSON body for this error.
    #[must_use]
    pub fn to_body(&self) -> ErrorResponse {
        ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        }
    }
}

impl From<sqlx::Error> for PulseError {
    fn from(err: sqlx::Error) -> Self {
        Self::PersistenceError(err.to_string())
    }
}

impl IntoResponse for PulseError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        } else {
            tracing::debug!(code = self.error_code(), error = %self, "request rejected");
        }
        let mut response = axum::Json(self.to_body()).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_and_statuses_line_up() {
        let cases = [
            (PulseError::InvalidRequest("x".into()), 1001, StatusCode::BAD_REQUEST),
            (PulseError::UpdateNotFound(uuid::Uuid::nil()), 2001, StatusCode::NOT_FOUND),
            (PulseError::GeoLookupError("x".into()), 2002, StatusCode::NOT_FOUND),
            (
                PulseError::LocationUnavailable("x".into()),
                2003,
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                PulseError::PersistenceError("x".into()),
                3001,
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                PulseError::SummaryUnavailable("x".into()),
                3002,
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                PulseError::Config("x".into()),
                3003,
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, code, status) in cases {
            assert_eq!(err.error_code(), code);
            assert_eq!(err.status_code(), status);
        }
    }

    #[test]
    fn body_omits_empty_details() {
        let body = PulseError::InvalidRequest("bad".into()).to_body();
        let json = serde_json::to_string(&body).unwrap_or_default();
        assert_eq!(
            json,
            r#"{"error":{"code":1001,"message":"invalid request: bad"}}"#
        );
    }

    #[test]
    fn into_response_sets_status() {
        let response = PulseError::UpdateNotFound(uuid::Uuid::nil()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
