// src/state.rs
use std::sync::Arc;

use crate::config::Settings;
use crate::services::vision_client::VisionClient;

pub type SharedState = Arc<AppState>;

/// Read-only per-process state; requests share nothing mutable.
#[derive(Debug)]
pub struct AppState {
    pub vision: VisionClient,
}

impl AppState {
    pub fn new(vision: VisionClient) -> Self {
        Self { vision }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(VisionClient::from_settings(settings))
    }
}
