use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde_json::Value;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    error::{AppError, NO_IMAGE_DATA},
    message::{ProcessImageRequest, UpstreamReply},
    state::SharedState,
};

#[instrument(skip(state, payload), fields(frame_id = %Uuid::new_v4()))]
pub async fn process_image_handler(
    State(state): State<SharedState>,
    payload: Result<Json<ProcessImageRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let image = match payload {
        Ok(Json(ProcessImageRequest { image: Some(image) })) if !image.is_empty() => image,
        Ok(_) => return Err(AppError::BadRequest(NO_IMAGE_DATA.to_string())),
        Err(rejection) => {
            warn!("rejected body: {}", rejection.body_text());
            return Err(AppError::BadRequest(NO_IMAGE_DATA.to_string()));
        }
    };

    info!(bytes = image.len(), "forwarding frame");

    let body = state.vision.describe(&image).await.map_err(|e| {
        error!("vision request failed: {:?}", e);
        AppError::from(e)
    })?;

    match UpstreamReply::decode(&body) {
        UpstreamReply::Success(_) => {}
        UpstreamReply::ProviderError(detail) => warn!("vision API reported an error: {}", detail),
        UpstreamReply::Malformed => warn!("vision API reply has no message content"),
    }

    Ok(Json(body))
}
