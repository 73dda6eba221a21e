// src/routes/mod.rs
pub mod process_image;

use crate::state::SharedState;
use axum::{
    Router,
    routing::{get, post},
};
use process_image::process_image_handler;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub fn create_router(static_dir: &str) -> Router<SharedState> {
    Router::new()
        .route("/process_image", post(process_image_handler))
        .route("/health", get(|| async { "OK" }))
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
}
