//! Application settings and configuration management

use crate::error::{AppError, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    pub storage: StorageConfig,
    pub inference: InferenceConfig,
    pub rate_limit: RateLimitConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

/// Cross-origin configuration. `*` allows any origin.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorsConfig {
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

fn default_allowed_origins() -> Vec<String> {
    vec!["*".to_string()]
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

/// Gallery storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// SQLite database file, or `:memory:` for a throwaway gallery
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

fn default_database_path() -> String {
    "./gallery.db".to_string()
}

/// Inference backend configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InferenceConfig {
    /// `procedural` (built in) or `http` (remote model server)
    #[serde(default = "default_backend")]
    pub backend: String,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
    #[serde(default = "default_latent_dim")]
    pub latent_dim: usize,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    /// Seed for the procedural backend's fixed weights
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
}

fn default_backend() -> String {
    "procedural".to_string()
}

fn default_timeout() -> u64 {
    30000
}

fn default_latent_dim() -> usize {
    100
}

fn default_width() -> u32 {
    64
}

fn default_height() -> u32 {
    96
}

fn default_seed() -> u64 {
    42
}

fn default_max_concurrent() -> usize {
    4
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            endpoint: None,
            timeout_ms: default_timeout(),
            latent_dim: default_latent_dim(),
            width: default_width(),
            height: default_height(),
            seed: default_seed(),
            max_concurrent: default_max_concurrent(),
        }
    }
}

/// Rate limiting configuration for mutating requests
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Off unless configured; the limiter is shared by every client
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_rps")]
    pub requests_per_second: u32,
    #[serde(default = "default_burst")]
    pub burst_size: u32,
}

fn default_rps() -> u32 {
    20
}

fn default_burst() -> u32 {
    50
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Settings {
    /// Load settings from configuration files and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/default.toml")
    }

    /// Load settings from a specific configuration file path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path
            .as_ref()
            .to_str()
            .ok_or_else(|| AppError::Internal("Config path is not valid UTF-8".to_string()))?;

        let config = Config::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", i64::from(default_port()))?
            .set_default("storage.database_path", default_database_path())?
            .set_default("inference.backend", default_backend())?
            .set_default("rate_limit.enabled", false)?
            .set_default("rate_limit.requests_per_second", i64::from(default_rps()))?
            .set_default("rate_limit.burst_size", i64::from(default_burst()))?
            .set_default("logging.level", default_log_level())?
            .set_default("logging.format", default_log_format())?
            .add_source(File::with_name(path).required(false))
            // Override with environment variables (prefixed with CARD_GALLERY_)
            .add_source(
                Environment::with_prefix("CARD_GALLERY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        Ok(settings)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(invalid("Server port cannot be 0".to_string()));
        }

        if self.storage.database_path.trim().is_empty() {
            return Err(invalid("Storage database_path cannot be empty".to_string()));
        }

        let inference = &self.inference;
        match inference.backend.as_str() {
            "procedural" => {}
            "http" => {
                if inference.endpoint.as_deref().map_or(true, str::is_empty) {
                    return Err(invalid(
                        "Inference backend 'http' requires an endpoint".to_string(),
                    ));
                }
            }
            other => {
                return Err(invalid(format!(
                    "Invalid inference backend '{}'. Must be 'procedural' or 'http'",
                    other
                )));
            }
        }
        if inference.latent_dim == 0 || inference.width == 0 || inference.height == 0 {
            return Err(invalid(
                "Inference latent_dim, width and height must be non-zero".to_string(),
            ));
        }
        if inference.max_concurrent == 0 {
            return Err(invalid("Inference max_concurrent must be at least 1".to_string()));
        }

        if self.rate_limit.enabled
            && (self.rate_limit.requests_per_second == 0 || self.rate_limit.burst_size == 0)
        {
            return Err(invalid(
                "Rate limit requests_per_second and burst_size must be non-zero".to_string(),
            ));
        }

        if !["json", "pretty"].contains(&self.logging.format.as_str()) {
            return Err(invalid(format!(
                "Invalid logging format '{}'. Must be 'json' or 'pretty'",
                self.logging.format
            )));
        }

        Ok(())
    }
}

fn invalid(message: String) -> AppError {
    AppError::Config(config::ConfigError::Message(message))
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: default_host(),
                port: default_port(),
            },
            cors: CorsConfig::default(),
            storage: StorageConfig {
                database_path: default_database_path(),
            },
            inference: InferenceConfig::default(),
            rate_limit: RateLimitConfig {
                enabled: false,
                requests_per_second: default_rps(),
                burst_size: default_burst(),
            },
            logging: LoggingConfig {
                level: default_log_level(),
                format: default_log_format(),
            },
        }
    }
}
