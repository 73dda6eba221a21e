use serde_json::Value;
use thiserror::Error;
use tracing::instrument;

use crate::message::{ProcessImageRequest, UpstreamReply};

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Server error: {code} - {reason}")]
    Status { code: u16, reason: String },
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
}

/// Client side of `POST /process_image`.
#[derive(Clone, Debug)]
pub struct RelayClient {
    http: reqwest::Client,
    endpoint: String,
}

impl RelayClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: format!("{}/process_image", base_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[instrument(skip(self, payload), fields(bytes = payload.len()))]
    pub async fn submit(&self, payload: &str) -> Result<UpstreamReply, SubmitError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(&ProcessImageRequest {
                image: Some(payload.to_string()),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SubmitError::Status {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body: Value = response.json().await?;
        Ok(UpstreamReply::decode(&body))
    }
}
