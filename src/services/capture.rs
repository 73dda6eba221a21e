// src/services/capture.rs
use tokio::sync::watch;
use tracing::{error, info};

use super::camera::{CameraError, CameraSession, FacingMode, MediaDevices};
use super::chat_log::ChatLog;
use super::frame::FrameEncoder;
use super::relay_client::{RelayClient, SubmitError};
use crate::message::{NO_RESPONSE_CONTENT, UpstreamReply};

/// Client session: live camera, capture canvas, relay and the chat log.
///
/// Every operation takes `&mut self`, so a second capture cannot start while
/// one is outstanding. The loading indicator is published on a watch channel
/// and is `true` only while a relay call is in flight.
pub struct ClientSession<D: MediaDevices> {
    camera: CameraSession<D>,
    encoder: FrameEncoder,
    relay: RelayClient,
    log: ChatLog,
    loading: watch::Sender<bool>,
}

impl<D: MediaDevices> ClientSession<D> {
    pub fn new(devices: D, relay: RelayClient, log: ChatLog) -> Self {
        Self {
            camera: CameraSession::new(devices),
            encoder: FrameEncoder::default(),
            relay,
            log,
            loading: watch::Sender::new(false),
        }
    }

    pub fn with_encoder(mut self, encoder: FrameEncoder) -> Self {
        self.encoder = encoder;
        self
    }

    pub fn log(&self) -> &ChatLog {
        &self.log
    }

    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    pub fn loading_indicator(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    pub fn facing(&self) -> FacingMode {
        self.camera.facing()
    }

    pub fn has_video(&self) -> bool {
        self.camera.is_live()
    }

    pub fn initialize(&mut self) {
        if let Err(e) = self.camera.start() {
            error!("camera acquisition failed: {}", e);
            self.log.push_error(format!("Error initializing webcam: {}", e));
        }
    }

    pub fn switch_camera(&mut self) -> FacingMode {
        if let Err(e) = self.camera.switch() {
            error!("camera switch failed: {}", e);
            self.log.push_error(format!("Error switching camera: {}", e));
        }
        self.camera.facing()
    }

    pub async fn capture_and_submit(&mut self) {
        let image = match self.camera.grab_frame() {
            Ok(image) => image,
            Err(CameraError::NoSource) => {
                self.log.push_error("Error: Video source not available.");
                return;
            }
            Err(e) => {
                error!("frame grab failed: {}", e);
                self.log.push_error(format!("Error: {}", e));
                return;
            }
        };

        let frame = match self.encoder.capture(&image) {
            Ok(frame) => frame,
            Err(e) => {
                error!("frame encoding failed: {}", e);
                self.log.push_error(format!("Error: {}", e));
                return;
            }
        };

        info!(frame_id = %frame.id, "submitting frame");
        self.process_image(&frame.payload).await;
    }

    /// Sends one payload to the relay and renders whatever comes back.
    pub async fn process_image(&mut self, payload: &str) {
        if payload.is_empty() {
            self.log.push_error("Error: No image data to process.");
            return;
        }

        self.loading.send_replace(true);
        let outcome = self.relay.submit(payload).await;
        self.loading.send_replace(false);

        self.render_outcome(outcome);
    }

    pub fn render_outcome(&mut self, outcome: Result<UpstreamReply, SubmitError>) {
        match outcome {
            Ok(UpstreamReply::Success(message)) => {
                self.log.push_assistant(message);
            }
            Ok(UpstreamReply::Malformed) => {
                self.log.push_assistant(NO_RESPONSE_CONTENT);
            }
            Ok(UpstreamReply::ProviderError(detail)) => {
                error!("server error: {}", detail);
                self.log.push_error(format!("Error: {}", detail));
            }
            Err(e) => {
                error!("relay request failed: {}", e);
                self.log.push_error(format!("Error: {}", e));
            }
        }
    }
}
