use thiserror::Error;

use crate::db::payload::ValidationError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")] Database(#[from] sea_orm::DbErr),

    #[error(transparent)] Validation(#[from] ValidationError),

    #[error("{0}")] NotFound(String),

    #[error("Content-Type must be {0}")] UnsupportedMediaType(&'static str),

    #[error("Configuration error: {0}")] Config(String),

    #[error("Internal error: {0}")] Internal(String),
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(serde::Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl AppError {
    pub fn to_error_response(&self) -> ErrorResponse {
        let (code, message, field) = match self {
            AppError::Database(e) if crate::retry::is_transient(e) =>
                ("SERVICE_UNAVAILABLE", "Database temporarily unavailable".to_string(), None),
            AppError::Database(e) => ("DATABASE_ERROR", e.to_string(), None),
            AppError::Validation(e) =>
                ("VALIDATION_ERROR", e.to_string(), e.field().map(str::to_string)),
            AppError::NotFound(msg) => ("NOT_FOUND", msg.clone(), None),
            AppError::UnsupportedMediaType(_) =>
                ("UNSUPPORTED_MEDIA_TYPE", self.to_string(), None),
            AppError::Config(msg) => ("CONFIG_ERROR", msg.clone(), None),
            AppError::Internal(msg) => ("INTERNAL_ERROR", msg.clone(), None),
        };

        ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                field,
            },
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::NotFound(_) => axum::http::StatusCode::NOT_FOUND,
            AppError::Validation(_) => axum::http::StatusCode::BAD_REQUEST,
            AppError::UnsupportedMediaType(_) => {
                axum::http::StatusCode::UNSUPPORTED_MEDIA_TYPE
            }
            AppError::Database(e) if crate::retry::is_transient(e) => {
                axum::http::StatusCode::SERVICE_UNAVAILABLE
            }
            _ => axum::http::StatusCode::INTERNAL_SERVER_ERROR,
        };

        let response = self.to_error_response();
        (status, axum::Json(response)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
