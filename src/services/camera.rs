// src/services/camera.rs
use std::path::PathBuf;

use image::DynamicImage;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum CameraError {
    #[error("{0}")]
    Unavailable(String),
    #[error("Video source not available.")]
    NoSource,
    #[error("Failed to read frame: {0}")]
    ReadFailed(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    User,
    Environment,
}

impl FacingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FacingMode::User => "user",
            FacingMode::Environment => "environment",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            FacingMode::User => FacingMode::Environment,
            FacingMode::Environment => FacingMode::User,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MediaConstraints {
    pub video: VideoConstraints,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoConstraints {
    pub facing_mode: FacingMode,
}

impl MediaConstraints {
    pub fn facing(mode: FacingMode) -> Self {
        Self {
            video: VideoConstraints { facing_mode: mode },
        }
    }
}

/// Facing mode and constraints to request after a switch from `current`.
pub fn next_constraints(current: FacingMode) -> (FacingMode, MediaConstraints) {
    let next = current.toggled();
    (next, MediaConstraints::facing(next))
}

/// A live stream handed out by [`MediaDevices`].
pub trait MediaStream: Send {
    fn current_frame(&mut self) -> Result<DynamicImage, CameraError>;

    /// Stops every track; the stream yields no frames afterwards.
    fn stop_tracks(&mut self);
}

pub trait MediaDevices: Send {
    fn get_user_media(
        &self,
        constraints: &MediaConstraints,
    ) -> Result<Box<dyn MediaStream>, CameraError>;
}

/// Holds the live stream and which way it faces.
pub struct CameraSession<D: MediaDevices> {
    devices: D,
    facing: FacingMode,
    stream: Option<Box<dyn MediaStream>>,
}

impl<D: MediaDevices> CameraSession<D> {
    pub fn new(devices: D) -> Self {
        Self {
            devices,
            facing: FacingMode::User,
            stream: None,
        }
    }

    pub fn facing(&self) -> FacingMode {
        self.facing
    }

    pub fn is_live(&self) -> bool {
        self.stream.is_some()
    }

    /// Acquires the initial front-facing stream.
    pub fn start(&mut self) -> Result<(), CameraError> {
        let constraints = MediaConstraints::facing(self.facing);
        self.release();
        self.stream = Some(self.devices.get_user_media(&constraints)?);
        info!(facing = self.facing.as_str(), "camera stream acquired");
        Ok(())
    }

    /// Toggles the facing mode and reacquires. On failure no stream is held.
    pub fn switch(&mut self) -> Result<FacingMode, CameraError> {
        let (next, constraints) = next_constraints(self.facing);
        self.facing = next;
        self.release();
        self.stream = Some(self.devices.get_user_media(&constraints)?);
        info!(facing = next.as_str(), "camera switched");
        Ok(next)
    }

    pub fn grab_frame(&mut self) -> Result<DynamicImage, CameraError> {
        match self.stream.as_mut() {
            Some(stream) => stream.current_frame(),
            None => Err(CameraError::NoSource),
        }
    }

    fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            debug!("stopping previous stream");
            stream.stop_tracks();
        }
    }
}

impl<D: MediaDevices> Drop for CameraSession<D> {
    fn drop(&mut self) {
        self.release();
    }
}

/// Devices backed by image files, one per facing mode.
#[derive(Clone, Debug, Default)]
pub struct FileDevices {
    pub front: Option<PathBuf>,
    pub back: Option<PathBuf>,
}

impl FileDevices {
    pub fn new(front: Option<PathBuf>, back: Option<PathBuf>) -> Self {
        Self { front, back }
    }
}

impl MediaDevices for FileDevices {
    fn get_user_media(
        &self,
        constraints: &MediaConstraints,
    ) -> Result<Box<dyn MediaStream>, CameraError> {
        let facing = constraints.video.facing_mode;
        let path = match facing {
            FacingMode::User => self.front.clone(),
            FacingMode::Environment => self.back.clone(),
        }
        .ok_or_else(|| {
            CameraError::Unavailable(format!("no {} camera found", facing.as_str()))
        })?;

        // Fail acquisition up front if the source can't be decoded.
        image::open(&path).map_err(|e| CameraError::Unavailable(e.to_string()))?;

        Ok(Box::new(FileStream { path, live: true }))
    }
}

struct FileStream {
    path: PathBuf,
    live: bool,
}

impl MediaStream for FileStream {
    fn current_frame(&mut self) -> Result<DynamicImage, CameraError> {
        if !self.live {
            return Err(CameraError::NoSource);
        }
        image::open(&self.path).map_err(|e| CameraError::ReadFailed(e.to_string()))
    }

    fn stop_tracks(&mut self) {
        self.live = false;
    }
}
