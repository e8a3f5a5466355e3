//! Router construction

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::api::handlers;
use crate::config::CorsConfig;
use crate::middleware::RateLimitLayer;
use crate::AppState;

/// Build the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        .route("/", get(handlers::root))
        .route("/api/card/generate", get(handlers::generate_card))
        .route("/api/gallery", get(handlers::list_gallery))
        .route("/api/gallery/share", post(handlers::share_card))
        .route("/api/gallery/:id", get(handlers::get_card))
        .route("/api/gallery/:id/upvote", post(handlers::upvote_card))
        .route("/api/gallery/:id/downvote", post(handlers::downvote_card));

    if state.settings.rate_limit.enabled {
        router = router.layer(RateLimitLayer::from_config(&state.settings.rate_limit));
    }

    router
        .layer(cors_layer(&state.settings.cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins = if config.allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::from(Any)
    } else {
        let parsed: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}
