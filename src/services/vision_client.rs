use serde_json::Value;
use thiserror::Error;
use tracing::{info, instrument};

use crate::config::Settings;
use crate::message::{ContentPart, ImageUrl, VisionMessage, VisionRequest};

pub const MAX_TOKENS: u32 = 400;

pub const INSTRUCTION: &str = "Whats in this image? Be descriptive. For each significant item recognized, \
wrap this word in <b> tags. Example: The image shows a <b>man</b> in front of a neutral-colored <b>wall</b>. \
He has short hair, wears <b>glasses</b>, and is donning a pair of over-ear <b>headphones</b>. ... \
Also output an itemized list of objects recognized, wrapped in <br> and <b> tags with label <br><b>Objects:.";

#[derive(Debug, Error)]
pub enum VisionError {
    #[error("request to vision API failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Client for the upstream chat-completions endpoint.
#[derive(Clone)]
pub struct VisionClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl std::fmt::Debug for VisionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisionClient")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish()
    }
}

impl VisionClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.upstream_url, &settings.api_key, &settings.model)
    }

    pub fn build_request(&self, base64_image: &str) -> VisionRequest {
        VisionRequest {
            model: self.model.clone(),
            messages: vec![VisionMessage {
                role: "user",
                content: vec![
                    ContentPart::Text { text: INSTRUCTION.to_string() },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: format!("data:image/jpeg;base64,{}", base64_image),
                        },
                    },
                ],
            }],
            max_tokens: MAX_TOKENS,
        }
    }

    /// Sends one frame upstream and returns the reply body untouched.
    ///
    /// Any upstream HTTP status is accepted as long as the body parses as JSON.
    #[instrument(skip(self, base64_image), fields(bytes = base64_image.len()))]
    pub async fn describe(&self, base64_image: &str) -> Result<Value, VisionError> {
        let request = self.build_request(base64_image);

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        info!(status = %response.status(), "vision API responded");
        Ok(response.json::<Value>().await?)
    }
}
