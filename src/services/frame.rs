// src/services/frame.rs
use base64::{Engine, engine::general_purpose::STANDARD};
use image::{DynamicImage, ImageError, codecs::jpeg::JpegEncoder, imageops::FilterType};
use thiserror::Error;
use uuid::Uuid;

pub const CANVAS_WIDTH: u32 = 640;
pub const CANVAS_HEIGHT: u32 = 480;
pub const JPEG_QUALITY: u8 = 92;

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("Failed to encode frame: {0}")]
    Encode(#[from] ImageError),
}

/// One captured still, ready to send.
#[derive(Clone, Debug)]
pub struct Frame {
    pub id: Uuid,
    pub payload: String,
}

/// Fixed-size off-screen canvas that turns video frames into JPEG payloads.
#[derive(Clone, Debug)]
pub struct FrameEncoder {
    width: u32,
    height: u32,
    quality: u8,
}

impl Default for FrameEncoder {
    fn default() -> Self {
        Self::new(CANVAS_WIDTH, CANVAS_HEIGHT)
    }
}

impl FrameEncoder {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            quality: JPEG_QUALITY,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Draws `image` onto the canvas and returns a JPEG data URL.
    pub fn to_data_url(&self, image: &DynamicImage) -> Result<String, FrameError> {
        let canvas = image
            .resize_exact(self.width, self.height, FilterType::Triangle)
            .to_rgb8();

        let mut jpeg = Vec::new();
        canvas.write_with_encoder(JpegEncoder::new_with_quality(&mut jpeg, self.quality))?;

        Ok(format!("data:image/jpeg;base64,{}", STANDARD.encode(&jpeg)))
    }

    pub fn capture(&self, image: &DynamicImage) -> Result<Frame, FrameError> {
        let data_url = self.to_data_url(image)?;
        Ok(Frame {
            id: Uuid::new_v4(),
            payload: strip_data_url_header(&data_url).unwrap_or_default().to_string(),
        })
    }
}

/// The part of a data URL after the first comma.
pub fn strip_data_url_header(data_url: &str) -> Option<&str> {
    data_url.split_once(',').map(|(_, payload)| payload)
}
