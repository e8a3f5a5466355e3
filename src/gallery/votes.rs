//! Vote ledger: the only path that changes a card's vote count

use std::sync::Arc;
use tracing::info;

use crate::error::Result;
use crate::gallery::{CardId, GalleryStore};

/// Direction of a vote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vote {
    Up,
    Down,
}

impl Vote {
    pub fn delta(&self) -> i64 {
        match self {
            Vote::Up => 1,
            Vote::Down => -1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Vote::Up => "upvote",
            Vote::Down => "downvote",
        }
    }
}

#[derive(Clone)]
pub struct VoteLedger {
    store: Arc<dyn GalleryStore>,
}

impl VoteLedger {
    pub fn new(store: Arc<dyn GalleryStore>) -> Self {
        Self { store }
    }

    /// Apply a vote and return the card's new count. Counts are never clamped.
    pub async fn cast(&self, id: CardId, vote: Vote) -> Result<i64> {
        let count = self.store.apply_vote(id, vote.delta()).await?;
        info!(card_id = id, vote = vote.as_str(), new_count = count, "Vote recorded");
        Ok(count)
    }

    pub async fn upvote(&self, id: CardId) -> Result<i64> {
        self.cast(id, Vote::Up).await
    }

    pub async fn downvote(&self, id: CardId) -> Result<i64> {
        self.cast(id, Vote::Down).await
    }
}
