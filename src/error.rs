use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::models::ErrorBody;

/// StoreError
///
/// Failure categories reported by any backing store (cards or submissions). The
/// split matters to callers: `PermissionDenied` means the current identity may not
/// write at all, `Unavailable` is transient.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("failed precondition: {0}")]
    FailedPrecondition(String),
    #[error("store error: {0}")]
    Other(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) => match db.code().as_deref() {
                // insufficient_privilege
                Some("42501") => StoreError::PermissionDenied(db.message().to_string()),
                // undefined_table / undefined_column
                Some("42P01") | Some("42703") => {
                    StoreError::FailedPrecondition(db.message().to_string())
                }
                _ => StoreError::Other(db.message().to_string()),
            },
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => StoreError::Unavailable(err.to_string()),
            _ => StoreError::Other(err.to_string()),
        }
    }
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            StoreError::PermissionDenied(_) => (StatusCode::FORBIDDEN, "Permission denied"),
            StoreError::Unavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "Store temporarily unavailable")
            }
            StoreError::FailedPrecondition(_) | StoreError::Other(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
            }
        };
        tracing::error!(error = %self, "store operation failed");
        error_response(status, message)
    }
}

/// ValidationError
///
/// Raised before any write when a required form field is blank after trimming.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill all required fields.")]
    MissingField(&'static str),
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        error_response(StatusCode::BAD_REQUEST, &self.to_string())
    }
}

/// RegistryError
///
/// Everything the Card Registry Service can refuse. The `Display` strings are the
/// exact messages carried in the `{error}` body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Invalid password")]
    Unauthorized,
    #[error("Missing required fields")]
    InvalidInput,
    #[error("Invalid request")]
    MalformedRequest,
    #[error("Card not found")]
    NotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for RegistryError {
    fn into_response(self) -> Response {
        let status = match &self {
            RegistryError::Unauthorized => StatusCode::UNAUTHORIZED,
            RegistryError::InvalidInput | RegistryError::MalformedRequest => {
                StatusCode::BAD_REQUEST
            }
            RegistryError::NotFound => StatusCode::NOT_FOUND,
            RegistryError::Store(err) => return err.clone().into_response(),
        };
        error_response(status, &self.to_string())
    }
}

/// SubmitError
///
/// Server-side outcome of `POST /api/submissions`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("Invalid request")]
    MalformedRequest,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for SubmitError {
    fn into_response(self) -> Response {
        match self {
            SubmitError::MalformedRequest => {
                error_response(StatusCode::BAD_REQUEST, "Invalid request")
            }
            SubmitError::Validation(err) => err.into_response(),
            SubmitError::Store(err) => err.into_response(),
        }
    }
}

pub(crate) fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
        .into_response()
}
