use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    /// Analyzer given zero records.
    #[error("{0}")]
    EmptyInput(String),

    /// Query builder given a description with no tables.
    #[error("{0}")]
    InvalidDescription(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid SQL: {0}")]
    InvalidSql(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::EmptyInput(_)
            | AppError::InvalidDescription(_)
            | AppError::Validation(_)
            | AppError::InvalidSql(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "success": false,
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

/// Convert anyhow::Error to AppError
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Convert csv::Error to AppError
impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::Validation(format!("CSV parse error: {}", err))
    }
}
