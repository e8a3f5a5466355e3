//! Pixel buffer to PNG conversion

use image::{codecs::png::PngEncoder, ExtendedColorType, ImageEncoder, RgbImage};

use crate::backend::traits::{PixelBuffer, CHANNELS};
use crate::error::{AppError, Result};

/// Map a model output value from `[-1, 1]` to a display byte
fn to_display_byte(value: f32) -> u8 {
    let unit = ((value + 1.0) / 2.0).clamp(0.0, 1.0);
    (unit * 255.0) as u8
}

/// Rescale, clamp and interleave a channel-major buffer into an RGB image
pub fn to_rgb_image(pixels: &PixelBuffer) -> Result<RgbImage> {
    pixels.validate()?;

    let plane = pixels.pixel_count();
    let mut rgb = Vec::with_capacity(CHANNELS * plane);
    for idx in 0..plane {
        for c in 0..CHANNELS {
            rgb.push(to_display_byte(pixels.data[c * plane + idx]));
        }
    }

    RgbImage::from_raw(pixels.width, pixels.height, rgb)
        .ok_or_else(|| AppError::Internal("RGB buffer does not match image size".to_string()))
}

/// Encode a pixel buffer as a PNG file in memory
pub fn encode_png(pixels: &PixelBuffer) -> Result<Vec<u8>> {
    let img = to_rgb_image(pixels)?;

    let mut png = Vec::new();
    PngEncoder::new(&mut png).write_image(
        img.as_raw(),
        img.width(),
        img.height(),
        ExtendedColorType::Rgb8,
    )?;
    Ok(png)
}
