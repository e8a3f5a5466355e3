//! Gallery module - shared cards, ranking, pagination and votes

pub mod query;
pub mod store;
pub mod votes;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::str::FromStr;

use crate::error::{AppError, Result};

pub use query::{GalleryPage, GalleryQuery, GalleryQueryEngine, MAX_PAGE_SIZE};
pub use store::SqliteGalleryStore;
pub use votes::{Vote, VoteLedger};

/// Identity of a shared card
pub type CardId = i64;

/// A shared, votable gallery record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub id: CardId,
    /// Caller-supplied payload, stored as given
    pub image_data: String,
    pub vote_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Gallery ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    /// Most votes first, newest first among equal votes
    #[default]
    Popular,
    /// Newest first
    Recent,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Popular => "popular",
            SortBy::Recent => "recent",
        }
    }
}

impl FromStr for SortBy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "popular" => Ok(SortBy::Popular),
            "recent" => Ok(SortBy::Recent),
            other => Err(AppError::InvalidRequest(format!(
                "sort_by must be 'popular' or 'recent', got '{}'",
                other
            ))),
        }
    }
}

/// One ordered slice of the gallery together with the full card count
#[derive(Debug, Clone)]
pub struct CardSlice {
    pub cards: Vec<Card>,
    pub total: u64,
}

/// Durable home of every shared card.
///
/// The store owns identity assignment and the vote counter; readers and the
/// vote ledger go through it and keep no copies of their own.
#[async_trait]
pub trait GalleryStore: Send + Sync + 'static {
    /// Persist a new card with zero votes and the current time
    async fn share(&self, image_data: String) -> Result<Card>;

    /// Fetch one card, or `CardNotFound`
    async fn get(&self, id: CardId) -> Result<Card>;

    /// Number of stored cards
    async fn count(&self) -> Result<u64>;

    /// Read `limit` cards starting at `offset` in the given order, plus the total
    async fn fetch_slice(&self, order: SortBy, offset: u64, limit: u32) -> Result<CardSlice>;

    /// Add `delta` to a card's vote count in one atomic step; returns the new count
    async fn apply_vote(&self, id: CardId, delta: i64) -> Result<i64>;
}
