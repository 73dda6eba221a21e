// src/error.rs
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::message::ErrorBody;
use crate::services::vision_client::VisionError;

pub const NO_IMAGE_DATA: &str = "No image data received.";
pub const PROCESSING_FAILED: &str = "Failed to process the image.";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("upstream call failed: {0}")]
    Upstream(#[from] VisionError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            // Detail is logged by the handler, never sent to the caller.
            AppError::Upstream(_) => (StatusCode::INTERNAL_SERVER_ERROR, PROCESSING_FAILED.to_string()),
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}
