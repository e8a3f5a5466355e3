//! Common traits and types for inference backends

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Number of colour channels every backend produces (RGB)
pub const CHANNELS: usize = 3;

/// Raw model output.
///
/// Values are laid out channel-major (`C x H x W`) and sit in the model's
/// native `[-1, 1]` range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub data: Vec<f32>,
}

impl PixelBuffer {
    /// Build a buffer, checking that `data` covers every channel of every pixel
    pub fn new(width: u32, height: u32, data: Vec<f32>) -> Result<Self> {
        let buffer = Self {
            width,
            height,
            data,
        };
        buffer.validate()?;
        Ok(buffer)
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Check the buffer shape
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(AppError::Inference(format!(
                "Empty pixel buffer ({}x{})",
                self.width, self.height
            )));
        }
        let expected = CHANNELS * self.pixel_count();
        if self.data.len() != expected {
            return Err(AppError::Inference(format!(
                "Pixel buffer has {} values, expected {} for {}x{}x{}",
                self.data.len(),
                expected,
                CHANNELS,
                self.height,
                self.width
            )));
        }
        Ok(())
    }
}

/// A loaded, read-only generative model.
///
/// Implementations are built once at startup and shared behind an `Arc`;
/// each call is a pure function of its latent input.
#[async_trait]
pub trait InferenceService: Send + Sync {
    /// Get the backend name
    fn name(&self) -> &str;

    /// Dimensionality of the latent vector the model consumes
    fn latent_dim(&self) -> usize;

    /// Map a latent vector to a pixel buffer
    async fn infer(&self, latent: &[f32]) -> Result<PixelBuffer>;
}

/// Reject latent vectors of the wrong size before they reach a model
pub fn check_latent(service: &dyn InferenceService, latent: &[f32]) -> Result<()> {
    if latent.len() != service.latent_dim() {
        return Err(AppError::Inference(format!(
            "Backend '{}' expects a latent vector of {} values, got {}",
            service.name(),
            service.latent_dim(),
            latent.len()
        )));
    }
    Ok(())
}
