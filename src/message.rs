// src/message.rs
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const NO_RESPONSE_CONTENT: &str = "No response content.";

/// Body of `POST /process_image`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessImageRequest {
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub error: String,
}

// Upstream chat-completions request.

#[derive(Debug, Clone, Serialize)]
pub struct VisionRequest {
    pub model: String,
    pub messages: Vec<VisionMessage>,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct VisionMessage {
    pub role: &'static str,
    pub content: Vec<ContentPart>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

/// What an upstream reply body amounts to once inspected.
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamReply {
    Success(String),
    ProviderError(String),
    Malformed,
}

impl UpstreamReply {
    /// Classifies a reply body without trusting its shape.
    pub fn decode(body: &Value) -> Self {
        if let Some(error) = body.get("error").filter(|e| is_truthy(e)) {
            let detail = match error {
                Value::String(s) => s.clone(),
                Value::Object(obj) => obj
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| error.to_string()),
                other => other.to_string(),
            };
            return UpstreamReply::ProviderError(detail);
        }

        match body
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
        {
            Some(content) if !content.is_empty() => UpstreamReply::Success(content.to_string()),
            _ => UpstreamReply::Malformed,
        }
    }
}

// Falsy error fields (null, false, 0, "") do not count as a provider error.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
