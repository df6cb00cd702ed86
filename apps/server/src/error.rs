//! API error types.
//!
//! Translates layer errors into HTTP responses with a stable JSON shape:
//!
//! ```json
//! { "code": "not_found", "message": "Booking not found: ..." }
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use booking_core::CoreError;
use booking_db::DbError;

/// API-level errors, one variant per response class.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Caller input failed validation (400).
    #[error("{0}")]
    Validation(String),

    /// Requested entity doesn't exist (404).
    #[error("{0}")]
    NotFound(String),

    /// Operation conflicts with current state (409).
    ///
    /// ## When This Occurs
    /// - Submitting a non-draft booking
    /// - Cancelling an already cancelled booking
    /// - Duplicate unique keys
    #[error("{0}")]
    Conflict(String),

    /// Anything unexpected (500). The detail is logged, not leaked.
    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            // Internal details stay in the logs
            ApiError::Internal(detail) => {
                error!(detail = %detail, "Internal API error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorBody { code, message })).into_response()
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            DbError::UniqueViolation { .. } | DbError::ForeignKeyViolation { .. } => {
                ApiError::Conflict(err.to_string())
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ItemNotFound(_) | CoreError::BookingNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            CoreError::InvalidBookingStatus { .. }
            | CoreError::EmptyBooking(_)
            | CoreError::TooManyItems { .. } => ApiError::Conflict(err.to_string()),
            CoreError::Validation(_) => ApiError::Validation(err.to_string()),
        }
    }
}

impl From<booking_core::ValidationError> for ApiError {
    fn from(err: booking_core::ValidationError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use booking_core::BookingStatus;

    #[test]
    fn test_db_error_mapping() {
        let err: ApiError = DbError::not_found("Booking", "BK-1").into();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err: ApiError = DbError::duplicate("item_code", "CHAIR-01").into();
        assert!(matches!(err, ApiError::Conflict(_)));

        let err: ApiError = DbError::PoolExhausted.into();
        assert!(matches!(err, ApiError::Internal(_)));
    }

    #[test]
    fn test_core_error_mapping() {
        let err: ApiError = CoreError::InvalidBookingStatus {
            booking_id: "BK-1".to_string(),
            current_status: BookingStatus::Cancelled,
        }
        .into();
        assert!(matches!(err, ApiError::Conflict(_)));

        let err: ApiError = CoreError::BookingNotFound("BK-2".to_string()).into();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
