use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to fetch data: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("Invalid upstream payload: {0}")]
    UpstreamPayload(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Fetch(ref e) => {
                tracing::error!("Fetch error: {:?}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    json!({ "error": "Failed to fetch data", "details": e.to_string() }),
                )
            }
            AppError::UpstreamPayload(ref e) => {
                tracing::error!("Upstream payload error: {:?}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    json!({ "error": "Invalid upstream payload", "details": e.to_string() }),
                )
            }
            AppError::Config(ref msg) => {
                tracing::error!("Configuration error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error" }),
                )
            }
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
