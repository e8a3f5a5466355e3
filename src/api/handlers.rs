//! Route handlers

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use std::sync::Arc;
use tracing::debug;

use crate::api::types::{
    CardView, GalleryParams, GalleryResponse, ShareRequest, ShareResponse, StatusResponse,
    VoteResponse,
};
use crate::error::{AppError, Result};
use crate::gallery::{CardId, GalleryQuery, GalleryStore, Vote};
use crate::generation::GeneratedCard;
use crate::AppState;

type CardPath = std::result::Result<Path<CardId>, PathRejection>;

fn card_id(path: CardPath) -> Result<CardId> {
    let Path(id) = path.map_err(|e| AppError::InvalidRequest(e.body_text()))?;
    Ok(id)
}

/// GET /
pub async fn root() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "online".to_string(),
    })
}

/// GET /api/card/generate
pub async fn generate_card(State(state): State<Arc<AppState>>) -> Result<Json<GeneratedCard>> {
    let card = state.pipeline.generate().await?;
    Ok(Json(card))
}

/// POST /api/gallery/share
pub async fn share_card(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ShareRequest>,
) -> Result<Json<ShareResponse>> {
    let card = state.gallery.share(request.image_data).await?;

    Ok(Json(ShareResponse {
        id: card.id,
        image: state.encoder.wrap_shared(&card.image_data),
        upvotes: card.vote_count,
        created_at: card.created_at,
        message: "Card shared to gallery".to_string(),
    }))
}

/// GET /api/gallery
pub async fn list_gallery(
    State(state): State<Arc<AppState>>,
    params: std::result::Result<Query<GalleryParams>, QueryRejection>,
) -> Result<Json<GalleryResponse>> {
    let Query(params) = params.map_err(|e| AppError::InvalidRequest(e.body_text()))?;
    let query = GalleryQuery::parse(params.sort_by.as_deref(), params.page, params.limit)?;
    debug!(?query, "Listing gallery");

    let page = state.queries.run(query).await?;
    Ok(Json(GalleryResponse::from_page(page, &state.encoder)))
}

/// GET /api/gallery/:id
pub async fn get_card(
    State(state): State<Arc<AppState>>,
    path: CardPath,
) -> Result<Json<CardView>> {
    let card = state.gallery.get(card_id(path)?).await?;
    Ok(Json(CardView::from_card(card, &state.encoder)))
}

/// POST /api/gallery/:id/upvote
pub async fn upvote_card(
    State(state): State<Arc<AppState>>,
    path: CardPath,
) -> Result<Json<VoteResponse>> {
    record_vote(&state, card_id(path)?, Vote::Up).await
}

/// POST /api/gallery/:id/downvote
pub async fn downvote_card(
    State(state): State<Arc<AppState>>,
    path: CardPath,
) -> Result<Json<VoteResponse>> {
    record_vote(&state, card_id(path)?, Vote::Down).await
}

async fn record_vote(state: &AppState, id: CardId, vote: Vote) -> Result<Json<VoteResponse>> {
    let new_count = state.votes.cast(id, vote).await?;
    let message = match vote {
        Vote::Up => "Upvoted",
        Vote::Down => "Downvoted",
    };

    Ok(Json(VoteResponse {
        success: true,
        new_upvote_count: new_count,
        message: message.to_string(),
    }))
}
