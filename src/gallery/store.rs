//! SQLite-backed gallery store.
//!
//! Every operation runs inside a [`Session`]: the connection lock is taken
//! on a blocking worker thread and released when the session goes out of
//! scope, whether the operation succeeded or not.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use parking_lot::{Mutex, MutexGuard};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::StorageConfig;
use crate::error::{AppError, Result};
use crate::gallery::{Card, CardId, CardSlice, GalleryStore, SortBy};

const IN_MEMORY: &str = ":memory:";

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS generated_cards (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        image_data  TEXT NOT NULL,
        upvotes     INTEGER NOT NULL DEFAULT 0,
        created_at  TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_upvotes_desc
        ON generated_cards(upvotes DESC, created_at DESC, id DESC);
    CREATE INDEX IF NOT EXISTS idx_created_at_desc
        ON generated_cards(created_at DESC, id DESC);
";

const CARD_COLUMNS: &str = "id, image_data, upvotes, created_at";

/// Gallery persisted in a single SQLite database
#[derive(Clone)]
pub struct SqliteGalleryStore {
    conn: Arc<Mutex<Connection>>,
}

/// Scoped access to the database for one operation
pub struct Session<'a> {
    conn: MutexGuard<'a, Connection>,
}

impl SqliteGalleryStore {
    /// Open the store described by configuration
    pub fn from_config(config: &StorageConfig) -> Result<Self> {
        Self::open(&config.database_path)
    }

    /// Open (or create) a gallery database. `:memory:` opens a private in-memory one.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.as_os_str() == IN_MEMORY {
            return Self::open_in_memory();
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        info!(path = %path.display(), "Opening gallery database");
        let conn = Connection::open(path)?;
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))?;
        conn.busy_timeout(Duration::from_secs(5))?;

        Self::from_connection(conn)
    }

    /// Open an empty in-memory gallery
    pub fn open_in_memory() -> Result<Self> {
        debug!("Opening in-memory gallery database");
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `op` inside a session on the blocking pool
    async fn with_session<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&Session<'_>) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let session = Session { conn: conn.lock() };
            op(&session)
        })
        .await
        .map_err(|e| AppError::Internal(format!("Storage task failed: {}", e)))?
    }
}

impl Session<'_> {
    fn insert_card(&self, image_data: &str, created_at: DateTime<Utc>) -> Result<Card> {
        self.conn.execute(
            "INSERT INTO generated_cards (image_data, upvotes, created_at) VALUES (?1, 0, ?2)",
            params![image_data, encode_timestamp(&created_at)],
        )?;

        Ok(Card {
            id: self.conn.last_insert_rowid(),
            image_data: image_data.to_string(),
            vote_count: 0,
            created_at,
        })
    }

    fn find_card(&self, id: CardId) -> Result<Option<Card>> {
        let card = self
            .conn
            .query_row(
                &format!("SELECT {} FROM generated_cards WHERE id = ?1", CARD_COLUMNS),
                params![id],
                row_to_card,
            )
            .optional()?;
        Ok(card)
    }

    fn count_cards(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM generated_cards", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }

    fn select_cards(&self, order: SortBy, offset: u64, limit: u32) -> Result<Vec<Card>> {
        let order_clause = match order {
            SortBy::Popular => "upvotes DESC, created_at DESC, id DESC",
            SortBy::Recent => "created_at DESC, id DESC",
        };
        let sql = format!(
            "SELECT {} FROM generated_cards ORDER BY {} LIMIT ?1 OFFSET ?2",
            CARD_COLUMNS, order_clause
        );

        let offset = i64::try_from(offset).unwrap_or(i64::MAX);
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let rows = stmt.query_map(params![i64::from(limit), offset], row_to_card)?;

        let mut cards = Vec::new();
        for row in rows {
            cards.push(row?);
        }
        Ok(cards)
    }

    /// Single-statement delta; concurrent votes cannot overwrite each other
    fn add_votes(&self, id: CardId, delta: i64) -> Result<Option<i64>> {
        let count = self
            .conn
            .query_row(
                "UPDATE generated_cards SET upvotes = upvotes + ?1 WHERE id = ?2 RETURNING upvotes",
                params![delta, id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(count)
    }
}

/// Fixed-width UTC text so lexical order matches time order
fn encode_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn row_to_card(row: &Row<'_>) -> rusqlite::Result<Card> {
    let ts: String = row.get(3)?;
    let created_at = DateTime::parse_from_rfc3339(&ts)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
        })?;

    Ok(Card {
        id: row.get(0)?,
        image_data: row.get(1)?,
        vote_count: row.get(2)?,
        created_at,
    })
}

#[async_trait]
impl GalleryStore for SqliteGalleryStore {
    async fn share(&self, image_data: String) -> Result<Card> {
        // Stamped under the lock so id order and created_at order agree
        let card = self
            .with_session(move |session| {
                session.insert_card(&image_data, Utc::now().trunc_subsecs(6))
            })
            .await?;

        info!(card_id = card.id, "Card shared");
        Ok(card)
    }

    async fn get(&self, id: CardId) -> Result<Card> {
        self.with_session(move |session| session.find_card(id))
            .await?
            .ok_or(AppError::CardNotFound(id))
    }

    async fn count(&self) -> Result<u64> {
        self.with_session(|session| session.count_cards()).await
    }

    async fn fetch_slice(&self, order: SortBy, offset: u64, limit: u32) -> Result<CardSlice> {
        self.with_session(move |session| {
            let total = session.count_cards()?;
            let cards = session.select_cards(order, offset, limit)?;
            Ok(CardSlice { cards, total })
        })
        .await
    }

    async fn apply_vote(&self, id: CardId, delta: i64) -> Result<i64> {
        self.with_session(move |session| session.add_votes(id, delta))
            .await?
            .ok_or(AppError::CardNotFound(id))
    }
}
