use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use devices_core::error::CoreError;
use serde::Serialize;
use utoipa::ToSchema;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain and storage errors and adds HTTP-specific
/// variants. Implements [`IntoResponse`] to produce consistent JSON error
/// responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `devices_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A failure outside the domain, such as a handler panic. The message
    /// is logged, never sent.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// JSON body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    pub code: String,
}

const INTERNAL_MESSAGE: &str = "An internal error occurred";

impl AppError {
    /// Resolve the status code, error code and client-facing message.
    ///
    /// Storage and internal failures are logged here and replaced by a
    /// sanitized message.
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::InUse(msg) => (StatusCode::CONFLICT, "DEVICE_IN_USE", msg.clone()),
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Storage(msg) => {
                    tracing::error!(error = %msg, "Storage error");
                    internal("STORAGE_ERROR")
                }
                CoreError::UpdateFailed(msg) => {
                    tracing::error!(error = %msg, "Update failed");
                    internal("UPDATE_FAILED")
                }
                CoreError::DeleteFailed(msg) => {
                    tracing::error!(error = %msg, "Delete failed");
                    internal("DELETE_FAILED")
                }
            },
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal("INTERNAL_ERROR")
            }
        }
    }
}

fn internal(code: &'static str) -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        code,
        INTERNAL_MESSAGE.to_string(),
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = ErrorBody {
            error: message,
            code: code.to_string(),
        };

        (status, axum::Json(body)).into_response()
    }
}
