//! Generated Card Gallery
//!
//! Serves card images rendered by a generative model and keeps a public,
//! votable gallery of the cards people choose to share.

pub mod api;
pub mod backend;
pub mod config;
pub mod error;
pub mod gallery;
pub mod generation;
pub mod middleware;
pub mod response;

pub use error::{AppError, Result};

use std::sync::Arc;

use backend::InferenceService;
use gallery::{GalleryQueryEngine, GalleryStore, VoteLedger};
use generation::GenerationPipeline;
use response::ResponseEncoder;

/// Application state shared across all handlers
pub struct AppState {
    pub settings: Arc<config::Settings>,
    pub pipeline: Arc<GenerationPipeline>,
    pub gallery: Arc<dyn GalleryStore>,
    pub queries: GalleryQueryEngine,
    pub votes: VoteLedger,
    pub encoder: ResponseEncoder,
}

impl AppState {
    /// Wire the components around an already loaded model and an open store
    pub fn new(
        settings: config::Settings,
        backend: Arc<dyn InferenceService>,
        gallery: Arc<dyn GalleryStore>,
    ) -> Self {
        let pipeline = GenerationPipeline::new(backend, settings.inference.max_concurrent);

        Self {
            settings: Arc::new(settings),
            pipeline: Arc::new(pipeline),
            queries: GalleryQueryEngine::new(gallery.clone()),
            votes: VoteLedger::new(gallery.clone()),
            gallery,
            encoder: ResponseEncoder::new(),
        }
    }
}
