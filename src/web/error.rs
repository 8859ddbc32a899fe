use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Web-boundary errors, serialized as a JSON `{"error": ...}` body.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("content must not be empty")]
    EmptyContent,

    #[error("name must not be empty")]
    EmptyName,

    #[error("mention not found")]
    NotFound,

    #[error("{0}")]
    Upstream(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::EmptyContent | ApiError::EmptyName => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Upstream(e) => {
                error!("Request failed: {:#}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
