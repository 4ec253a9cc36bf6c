use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ordo_core::error::CoreError;
use ordo_db::DbError;
use serde::Serialize;

/// Message returned in place of any internal failure detail.
const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`DbError`] for store failures,
/// and adds HTTP-specific variants. Implements [`IntoResponse`] to produce
/// consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Database(#[from] DbError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// Machine-readable error class, sent alongside the JSON body.
pub const ERROR_CODE_HEADER: &str = "x-error-code";

/// `{ "error": "..." }`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl AppError {
    pub fn not_found(entity: &'static str) -> Self {
        AppError::Core(CoreError::NotFound { entity })
    }

    pub fn unauthorized(message: &str) -> Self {
        AppError::Core(CoreError::Unauthorized(message.to_string()))
    }

    /// Status, machine code and client-facing message for this error.
    pub fn classify(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Core(core) => classify_core_error(core),
            AppError::Database(err) => classify_db_error(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, error) = self.classify();
        (
            status,
            [(ERROR_CODE_HEADER, code)],
            axum::Json(ErrorBody { error }),
        )
            .into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        INTERNAL_MESSAGE.to_string(),
    )
}

fn classify_core_error(err: &CoreError) -> (StatusCode, &'static str, String) {
    match err {
        CoreError::NotFound { entity } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Referential(msg) => {
            (StatusCode::BAD_REQUEST, "REFERENTIAL_ERROR", msg.clone())
        }
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::Upstream(msg) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", msg.clone()),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            internal()
        }
    }
}

/// Classify a store error into an HTTP status, error code, and message.
///
/// - Deadline breaches map to 503.
/// - Foreign key violations map to 400 (the referenced row is gone).
/// - Unique constraint violations map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_db_error(err: &DbError) -> (StatusCode, &'static str, String) {
    match err {
        DbError::NotFound { entity } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} not found"),
        ),
        DbError::Timeout { operation, after } => {
            tracing::warn!(operation, ?after, "Database deadline exceeded");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "TIMEOUT",
                "The database did not respond in time".to_string(),
            )
        }
        err if err.is_foreign_key_violation() => {
            let message = match err.constraint() {
                Some("fk_tasks_project_id") => "Project not found".to_string(),
                _ => "Referenced record not found".to_string(),
            };
            (StatusCode::BAD_REQUEST, "REFERENTIAL_ERROR", message)
        }
        err if err.is_unique_violation() => {
            let constraint = err.constraint().unwrap_or("unknown");
            (
                StatusCode::CONFLICT,
                "CONFLICT",
                format!("Duplicate value violates unique constraint: {constraint}"),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}
