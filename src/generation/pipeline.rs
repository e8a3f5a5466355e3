//! Card generation: latent draw, inference, encoding and rarity

use rand::Rng;
use rand_distr::StandardNormal;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::backend::InferenceService;
use crate::error::{AppError, Result};
use crate::generation::rarity::{assign_rarity, Rarity};
use crate::response::ResponseEncoder;

/// A freshly generated, not yet shared card
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedCard {
    /// `data:image/png;base64,...`
    pub image: String,
    pub rarity: Rarity,
}

/// Draw a latent vector from the standard normal distribution
pub fn sample_latent<R: Rng + ?Sized>(rng: &mut R, dim: usize) -> Vec<f32> {
    (0..dim).map(|_| rng.sample(StandardNormal)).collect()
}

/// Composes the model, the encoder and the rarity draw
pub struct GenerationPipeline {
    backend: Arc<dyn InferenceService>,
    encoder: ResponseEncoder,
    permits: Semaphore,
}

impl GenerationPipeline {
    /// `max_concurrent` bounds how many inference calls run at once
    pub fn new(backend: Arc<dyn InferenceService>, max_concurrent: usize) -> Self {
        Self {
            backend,
            encoder: ResponseEncoder::new(),
            permits: Semaphore::new(max_concurrent.max(1)),
        }
    }

    /// Generate one card image with an independently drawn rarity
    pub async fn generate(&self) -> Result<GeneratedCard> {
        // thread_rng is not Send; finish drawing before the first await
        let (latent, rarity) = {
            let mut rng = rand::thread_rng();
            let latent = sample_latent(&mut rng, self.backend.latent_dim());
            (latent, assign_rarity(&mut rng))
        };

        let pixels = {
            let _permit = self
                .permits
                .acquire()
                .await
                .map_err(|_| AppError::Internal("Inference gate closed".to_string()))?;
            self.backend.infer(&latent).await?
        };

        let image = self.encoder.to_data_url(&pixels)?;

        debug!(
            backend = %self.backend.name(),
            rarity = %rarity,
            bytes = image.len(),
            "Generated card"
        );

        Ok(GeneratedCard { image, rarity })
    }
}
