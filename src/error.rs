use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Invalid or missing credentials")]
    Auth,

    #[error("Store failure")]
    Store(#[from] redis::RedisError),

    #[error("Corrupt stored record")]
    Decode(#[from] serde_json::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Auth => StatusCode::UNAUTHORIZED,
            AppError::Store { .. } | AppError::Decode { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Store details stay in the server log, not the response body.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("request failed: {self:?}");
            "Internal error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
