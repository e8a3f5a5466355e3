//! Response handling module - PNG encoding and base64 data URLs

pub mod base64;
pub mod png;

use crate::backend::traits::PixelBuffer;
use crate::error::Result;

/// Media type subtype used for every image the server emits
pub const IMAGE_FORMAT: &str = "png";

/// Turns model output into something a browser can display
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseEncoder;

impl ResponseEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Encode a pixel buffer to a lossless PNG container
    pub fn to_png(&self, pixels: &PixelBuffer) -> Result<Vec<u8>> {
        png::encode_png(pixels)
    }

    /// Encode a pixel buffer to a `data:image/png;base64,...` string
    pub fn to_data_url(&self, pixels: &PixelBuffer) -> Result<String> {
        let png = self.to_png(pixels)?;
        Ok(base64::create_data_url(&png, IMAGE_FORMAT))
    }

    /// Present a caller-supplied gallery payload as a data URL
    pub fn wrap_shared(&self, image_data: &str) -> String {
        base64::wrap_payload(image_data, IMAGE_FORMAT)
    }
}
