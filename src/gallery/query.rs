//! Sorted, paginated read access to the gallery

use std::sync::Arc;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::gallery::{Card, GalleryStore, SortBy};

/// Largest page the gallery will return, whatever the caller asks for
pub const MAX_PAGE_SIZE: u32 = 100;

/// Page size used when the caller does not give one
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// A validated gallery request. Pages start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GalleryQuery {
    pub sort_by: SortBy,
    pub page: u32,
    pub limit: u32,
}

impl GalleryQuery {
    /// Validate raw parameters. Missing values fall back to
    /// `popular`, page 1 and [`DEFAULT_PAGE_SIZE`]; `limit` is clamped to
    /// [`MAX_PAGE_SIZE`].
    pub fn parse(sort_by: Option<&str>, page: Option<u32>, limit: Option<u32>) -> Result<Self> {
        let sort_by = match sort_by {
            Some(raw) => raw.parse()?,
            None => SortBy::default(),
        };

        let page = page.unwrap_or(1);
        if page == 0 {
            return Err(AppError::InvalidRequest("page starts at 1".to_string()));
        }

        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE);
        if limit == 0 {
            return Err(AppError::InvalidRequest("limit must be at least 1".to_string()));
        }

        Ok(Self {
            sort_by,
            page,
            limit: limit.min(MAX_PAGE_SIZE),
        })
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }

    /// Whether cards remain beyond this page
    pub fn has_more(&self, total: u64) -> bool {
        u64::from(self.page) * u64::from(self.limit) < total
    }
}

/// One page of the gallery
#[derive(Debug, Clone)]
pub struct GalleryPage {
    pub cards: Vec<Card>,
    /// Every stored card, independent of page and limit
    pub total: u64,
    pub has_more: bool,
}

/// Sorts and paginates the store's contents
#[derive(Clone)]
pub struct GalleryQueryEngine {
    store: Arc<dyn GalleryStore>,
}

impl GalleryQueryEngine {
    pub fn new(store: Arc<dyn GalleryStore>) -> Self {
        Self { store }
    }

    /// List cards from raw parameters
    pub async fn list(&self, sort_by: &str, page: u32, limit: u32) -> Result<GalleryPage> {
        let query = GalleryQuery::parse(Some(sort_by), Some(page), Some(limit))?;
        self.run(query).await
    }

    /// List cards for an already validated query
    pub async fn run(&self, query: GalleryQuery) -> Result<GalleryPage> {
        let slice = self
            .store
            .fetch_slice(query.sort_by, query.offset(), query.limit)
            .await?;

        debug!(
            sort_by = query.sort_by.as_str(),
            page = query.page,
            limit = query.limit,
            returned = slice.cards.len(),
            total = slice.total,
            "Gallery page served"
        );

        Ok(GalleryPage {
            has_more: query.has_more(slice.total),
            cards: slice.cards,
            total: slice.total,
        })
    }
}
