//! Backend module - inference trait, built-in and HTTP model backends

pub mod http_backend;
pub mod procedural;
pub mod traits;

use std::sync::Arc;
use tracing::info;

use crate::config::InferenceConfig;
use crate::error::{AppError, Result};

pub use traits::{InferenceService, PixelBuffer};

/// Load the configured model once; the returned handle is shared read-only
pub fn load(config: &InferenceConfig) -> Result<Arc<dyn InferenceService>> {
    let backend: Arc<dyn InferenceService> = match config.backend.as_str() {
        "procedural" => Arc::new(procedural::ProceduralBackend::new(config)),
        "http" => Arc::new(http_backend::HttpBackend::new(config)?),
        other => {
            return Err(AppError::Inference(format!(
                "Unknown inference backend: {}",
                other
            )))
        }
    };

    info!(
        backend = %backend.name(),
        latent_dim = backend.latent_dim(),
        "Inference backend ready"
    );
    Ok(backend)
}
