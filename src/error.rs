use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Errors raised while converting an untyped payload into a `Recommendation`.
///
/// Each variant names the offending field so the caller can see exactly
/// what was wrong with the request body.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid recommendation: missing {0}")]
    MissingField(&'static str),

    #[error("invalid type for [{field}]: expected {expected}, got {found}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("invalid date [{0}]: expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("unknown recommendation type [{0}]")]
    UnknownType(String),

    #[error("body of request contained bad or no data")]
    BadPayload,

    #[error("update called with empty id field")]
    MissingId,
}

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    NotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
