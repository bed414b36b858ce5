use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use ceylon_core::CoreError;

#[derive(Debug)]
pub enum AppError {
    AuthenticationError(String),
    ValidationError { message: String, fields: Vec<String> },
    NotFoundError(String),
    ConflictError(String),
    InternalServerError(String),
    Anyhow(anyhow::Error),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::ValidationError { message: message.into(), fields: Vec::new() }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, fields) = match self {
            AppError::AuthenticationError(msg) => (StatusCode::UNAUTHORIZED, msg, Vec::new()),
            AppError::ValidationError { message, fields } => (StatusCode::BAD_REQUEST, message, fields),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg, Vec::new()),
            AppError::ConflictError(msg) => (StatusCode::CONFLICT, msg, Vec::new()),
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string(), Vec::new())
            }
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {:#}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string(), Vec::new())
            }
        };

        let body = Json(json!({
            "error": error_message,
            "fields": fields,
        }));

        (status, body).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(fields) => AppError::ValidationError {
                message: format!("Invalid or missing fields: {}", fields.join(", ")),
                fields,
            },
            CoreError::NotFound { .. } => AppError::NotFoundError(err.to_string()),
            CoreError::Unavailable(msg) => AppError::ConflictError(msg),
            CoreError::Conflict(_) | CoreError::InvalidTransition(_) => AppError::ConflictError(err.to_string()),
            CoreError::Storage(_) => AppError::Anyhow(anyhow::Error::new(err)),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::validation(rejection.body_text())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Anyhow(err)
    }
}
