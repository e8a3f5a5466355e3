//! Request and response bodies (field names are the wire contract)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::gallery::{Card, CardId, GalleryPage};
use crate::response::ResponseEncoder;

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct ShareRequest {
    pub image_data: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ShareResponse {
    pub id: CardId,
    pub image: String,
    pub upvotes: i64,
    pub created_at: DateTime<Utc>,
    pub message: String,
}

/// Query string of `GET /api/gallery`
#[derive(Debug, Default, Deserialize)]
pub struct GalleryParams {
    pub sort_by: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CardView {
    pub id: CardId,
    pub image: String,
    pub upvotes: i64,
    pub created_at: DateTime<Utc>,
}

impl CardView {
    pub fn from_card(card: Card, encoder: &ResponseEncoder) -> Self {
        Self {
            id: card.id,
            image: encoder.wrap_shared(&card.image_data),
            upvotes: card.vote_count,
            created_at: card.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GalleryResponse {
    pub cards: Vec<CardView>,
    pub total: u64,
    pub has_more: bool,
}

impl GalleryResponse {
    pub fn from_page(page: GalleryPage, encoder: &ResponseEncoder) -> Self {
        Self {
            cards: page
                .cards
                .into_iter()
                .map(|card| CardView::from_card(card, encoder))
                .collect(),
            total: page.total,
            has_more: page.has_more,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VoteResponse {
    pub success: bool,
    pub new_upvote_count: i64,
    pub message: String,
}
