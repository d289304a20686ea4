// ABOUTME: Centralized error taxonomy for the diary with logging and HTTP mapping
// ABOUTME: Every failure reaches the client as the uniform error wrapper, never a raw store error

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DbErr, SqlErr};
use std::fmt;

use crate::types::ApiResponse;

#[derive(Debug)]
pub enum AppError {
    /// A required field is missing or out of range.
    Validation(String),
    NotFound(String),
    /// A child row points at a parent that does not exist.
    Integrity(String),
    Conflict(String),
    /// The store could not be reached.
    Unavailable(String),
    Database(DbErr),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Validation error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Integrity(msg) => write!(f, "Referential integrity error: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Unavailable(msg) => write!(f, "Store unavailable: {}", msg),
            AppError::Database(err) => write!(f, "Database error: {}", err),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// Logs the error at a level matching its class and returns the status
    /// code and the message that is safe to show to clients.
    pub fn public_parts(&self) -> (StatusCode, String) {
        match self {
            AppError::Validation(msg) => {
                tracing::warn!("Validation failed: {}", msg);
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            AppError::NotFound(msg) => {
                tracing::info!("Resource not found: {}", msg);
                (StatusCode::NOT_FOUND, self.to_string())
            }
            AppError::Integrity(msg) => {
                tracing::warn!("Integrity violation: {}", msg);
                (StatusCode::UNPROCESSABLE_ENTITY, self.to_string())
            }
            AppError::Conflict(msg) => {
                tracing::warn!("Conflict: {}", msg);
                (StatusCode::CONFLICT, self.to_string())
            }
            AppError::Unavailable(_) => {
                tracing::error!("{}", self);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Storage is temporarily unavailable".to_string(),
                )
            }
            AppError::Database(_) => {
                tracing::error!("{}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database operation failed".to_string(),
                )
            }
            AppError::Internal(_) => {
                tracing::error!("{}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.public_parts();
        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => return AppError::Integrity(msg),
            Some(SqlErr::UniqueConstraintViolation(msg)) => return AppError::Conflict(msg),
            _ => {}
        }

        match err {
            DbErr::RecordNotFound(msg) => AppError::NotFound(msg),
            DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => AppError::Unavailable(err.to_string()),
            other => AppError::Database(other),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_class() {
        let cases = [
            (AppError::Validation("name".into()), StatusCode::BAD_REQUEST),
            (AppError::NotFound("recipe 9".into()), StatusCode::NOT_FOUND),
            (AppError::Integrity("recipe 9".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (AppError::Conflict("username".into()), StatusCode::CONFLICT),
            (AppError::Unavailable("pool".into()), StatusCode::SERVICE_UNAVAILABLE),
            (AppError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(err.public_parts().0, expected, "{}", err);
        }
    }

    #[test]
    fn server_errors_hide_details() {
        let err = AppError::Database(DbErr::Custom("disk I/O error at page 42".into()));
        let (status, message) = err.public_parts();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!message.contains("page 42"));
    }

    #[test]
    fn body_rejection_is_validation_error() {
        let err: AppError = JsonRejection::from(
            axum::extract::rejection::MissingJsonContentType::default(),
        )
        .into();
        assert_eq!(err.public_parts().0, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn record_not_found_maps_to_not_found() {
        let err: AppError = DbErr::RecordNotFound("step 3".into()).into();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
