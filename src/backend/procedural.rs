//! Built-in procedural generator.
//!
//! A fixed bank of sinusoidal basis images, drawn once from a seeded RNG,
//! is mixed by the latent vector and squashed through `tanh`. The weights
//! never change after construction, so one instance can serve every request.

use async_trait::async_trait;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::f32::consts::PI;
use std::sync::Arc;
use tracing::{debug, info};

use crate::backend::traits::{check_latent, InferenceService, PixelBuffer, CHANNELS};
use crate::config::InferenceConfig;
use crate::error::{AppError, Result};

/// One basis image per latent dimension
struct BasisComponent {
    freq_x: f32,
    freq_y: f32,
    phase: f32,
    gains: [f32; CHANNELS],
}

struct Weights {
    width: u32,
    height: u32,
    components: Vec<BasisComponent>,
    scale: f32,
}

impl Weights {
    fn render(&self, latent: &[f32]) -> Vec<f32> {
        let (w, h) = (self.width as usize, self.height as usize);
        let plane = w * h;
        let mut out = vec![0.0f32; CHANNELS * plane];

        for (z, component) in latent.iter().zip(&self.components) {
            for y in 0..h {
                let v = y as f32 / h as f32;
                for x in 0..w {
                    let u = x as f32 / w as f32;
                    let wave = (component.freq_x * u + component.freq_y * v + component.phase).sin();
                    let idx = y * w + x;
                    for (c, gain) in component.gains.iter().enumerate() {
                        out[c * plane + idx] += z * gain * wave;
                    }
                }
            }
        }

        for value in &mut out {
            *value = (*value * self.scale).tanh();
        }
        out
    }
}

/// Procedural image model
pub struct ProceduralBackend {
    name: String,
    weights: Arc<Weights>,
}

impl ProceduralBackend {
    /// Create the generator from configuration
    pub fn new(config: &InferenceConfig) -> Self {
        Self::with_shape(config.latent_dim, config.width, config.height, config.seed)
    }

    /// Create a generator with an explicit latent size and output shape
    pub fn with_shape(latent_dim: usize, width: u32, height: u32, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let components = (0..latent_dim)
            .map(|_| BasisComponent {
                freq_x: rng.gen_range(0.5..6.0) * PI,
                freq_y: rng.gen_range(0.5..6.0) * PI,
                phase: rng.gen_range(0.0..2.0 * PI),
                gains: [
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                ],
            })
            .collect();

        info!(latent_dim, width, height, seed, "Procedural generator loaded");

        Self {
            name: "procedural".to_string(),
            weights: Arc::new(Weights {
                width,
                height,
                components,
                scale: 2.0 / (latent_dim as f32).sqrt(),
            }),
        }
    }
}

#[async_trait]
impl InferenceService for ProceduralBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn latent_dim(&self) -> usize {
        self.weights.components.len()
    }

    async fn infer(&self, latent: &[f32]) -> Result<PixelBuffer> {
        check_latent(self, latent)?;

        let weights = self.weights.clone();
        let latent = latent.to_vec();
        let data = tokio::task::spawn_blocking(move || weights.render(&latent))
            .await
            .map_err(|e| AppError::Internal(format!("Inference task failed: {}", e)))?;

        debug!(
            backend = %self.name,
            width = self.weights.width,
            height = self.weights.height,
            "Rendered pixel buffer"
        );

        PixelBuffer::new(self.weights.width, self.weights.height, data)
    }
}
