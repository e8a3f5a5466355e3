//! HTTP inference client for a remote model server

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::backend::traits::{check_latent, InferenceService, PixelBuffer};
use crate::config::InferenceConfig;
use crate::error::{AppError, Result};

/// Model served over HTTP
pub struct HttpBackend {
    name: String,
    client: Client,
    endpoint: String,
    latent_dim: usize,
}

#[derive(Debug, Serialize)]
struct ApiInferRequest<'a> {
    latent: &'a [f32],
}

/// Pixel tensor returned by the model server (`C x H x W`, values in `[-1, 1]`)
#[derive(Debug, Deserialize)]
struct ApiInferResponse {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl HttpBackend {
    /// Create a new HTTP backend from configuration
    pub fn new(config: &InferenceConfig) -> Result<Self> {
        let endpoint = config
            .endpoint
            .clone()
            .ok_or_else(|| AppError::Inference("HTTP backend requires an endpoint".to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            name: "http".to_string(),
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            latent_dim: config.latent_dim,
        })
    }
}

#[async_trait]
impl InferenceService for HttpBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn latent_dim(&self) -> usize {
        self.latent_dim
    }

    async fn infer(&self, latent: &[f32]) -> Result<PixelBuffer> {
        check_latent(self, latent)?;

        let url = format!("{}/infer", self.endpoint);
        debug!(backend = %self.name, url = %url, "Sending inference request");

        let response = self
            .client
            .post(&url)
            .json(&ApiInferRequest { latent })
            .send()
            .await
            .map_err(|e| {
                warn!(backend = %self.name, url = %url, error = %e, "Inference request failed");
                AppError::HttpClient(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Inference(format!(
                "Model server returned {}: {}",
                status, body
            )));
        }

        let api_response: ApiInferResponse = response
            .json()
            .await
            .map_err(|e| AppError::Inference(format!("Failed to parse response: {}", e)))?;

        PixelBuffer::new(api_response.width, api_response.height, api_response.data)
    }
}
