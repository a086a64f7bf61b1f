//! HTTP error type shared by every handler and extractor.
//!
//! Each error renders as `{ "error": <message>, "code": <CODE> }`. Messages
//! for server-side failures are replaced with a generic text after logging.

use std::fmt::Display;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use postboard_core::error::CoreError;
use serde::Serialize;

/// Postgres SQLSTATE for a unique violation.
const UNIQUE_VIOLATION: &str = "23505";
/// Postgres SQLSTATE for a foreign key violation.
const FOREIGN_KEY_VIOLATION: &str = "23503";

const SANITIZED_MESSAGE: &str = "An internal error occurred";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain decision refused the operation.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The request itself could not be read (malformed JSON, bad query string).
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// 404 for a uuid-keyed entity.
    pub fn not_found(entity: &'static str, id: impl Display) -> Self {
        AppError::Core(CoreError::not_found(entity, id))
    }

    fn body(&self) -> ErrorBody {
        match self {
            AppError::Core(err) => ErrorBody::from_core(err),
            AppError::Database(err) => ErrorBody::from_sqlx(err),
            AppError::BadRequest(msg) => ErrorBody::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            AppError::InternalError(msg) => ErrorBody::internal(msg),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = self.body();
        let payload = ErrorPayload {
            error: &body.message,
            code: body.code,
        };
        (body.status, axum::Json(payload)).into_response()
    }
}

#[derive(Serialize)]
struct ErrorPayload<'a> {
    error: &'a str,
    code: &'static str,
}

struct ErrorBody {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ErrorBody {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        ErrorBody {
            status,
            code,
            message: message.into(),
        }
    }

    /// Log the real cause and hide it from the client.
    fn internal(detail: &dyn Display) -> Self {
        tracing::error!(error = %detail, "Request failed");
        ErrorBody::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", SANITIZED_MESSAGE)
    }

    fn from_core(err: &CoreError) -> Self {
        match err {
            CoreError::NotFound { entity, id } => ErrorBody::new(
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{entity} with id {id} not found"),
            ),
            CoreError::Validation(msg) => {
                ErrorBody::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg)
            }
            CoreError::InvalidTransition(msg) => {
                ErrorBody::new(StatusCode::BAD_REQUEST, "INVALID_TRANSITION", msg)
            }
            CoreError::Unauthorized(msg) => {
                ErrorBody::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg)
            }
            CoreError::Forbidden(msg) => ErrorBody::new(StatusCode::FORBIDDEN, "FORBIDDEN", msg),
            CoreError::Internal(msg) => ErrorBody::internal(msg),
        }
    }

    /// Missing rows are 404s. Unique violations on a `uq_*` constraint and
    /// foreign key violations are 409s. Anything else is a sanitized 500.
    fn from_sqlx(err: &sqlx::Error) -> Self {
        let sqlx::Error::Database(db_err) = err else {
            return match err {
                sqlx::Error::RowNotFound => {
                    ErrorBody::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Resource not found")
                }
                other => ErrorBody::internal(other),
            };
        };

        let constraint = db_err.constraint().unwrap_or("unknown");
        match db_err.code().as_deref() {
            Some(UNIQUE_VIOLATION) if constraint.starts_with("uq_") => ErrorBody::new(
                StatusCode::CONFLICT,
                "CONFLICT",
                format!("Duplicate value violates unique constraint: {constraint}"),
            ),
            Some(FOREIGN_KEY_VIOLATION) => ErrorBody::new(
                StatusCode::CONFLICT,
                "CONFLICT",
                format!("Operation conflicts with related records: {constraint}"),
            ),
            _ => ErrorBody::internal(db_err),
        }
    }
}
