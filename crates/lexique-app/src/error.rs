use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use lexique_store::StoreError;

use crate::render;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Could not encode lookup result: {0}")]
    Encode(#[from] serde_json::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, render::not_found()).into_response(),
            other => {
                tracing::error!("Request failed: {other}");
                (StatusCode::INTERNAL_SERVER_ERROR, render::server_error()).into_response()
            }
        }
    }
}
