//! Configuration module

pub mod settings;

pub use settings::{
    CorsConfig, InferenceConfig, LoggingConfig, RateLimitConfig, ServerConfig, Settings,
    StorageConfig,
};
