//! Player store handle owned by the caller's application context.
//!
//! A `PlayerStore` is created by [`PlayerStore::initialize`] and torn down
//! by [`PlayerStore::close`]. Clones share one pool. After `close`, every
//! operation on any clone fails with `AppError::Uninitialized`; a new
//! `initialize` call yields a fresh pool.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::info;

use crate::config::StoreConfig;
use crate::models::player::PlayerRecord;
use crate::persistence::db::{self, Database};
use crate::persistence::player_repo::PlayerRepo;
use crate::Result;

/// Pooled access to the `players` table.
#[derive(Clone)]
pub struct PlayerStore {
    db: Arc<Database>,
    players: PlayerRepo,
}

impl PlayerStore {
    /// Open a pool against `database_url` and ensure the table exists.
    ///
    /// Safe to call on every process start.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Connection` if the database cannot be opened, or
    /// `AppError::Config` if the URL is invalid.
    pub async fn initialize(database_url: &str) -> Result<Self> {
        Self::from_config(&StoreConfig::from_url(database_url)?).await
    }

    /// Open a pool described by `config` and ensure the table exists.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Connection` if the database cannot be opened, or
    /// `AppError::Config` if the URL is invalid.
    pub async fn from_config(config: &StoreConfig) -> Result<Self> {
        let pool = db::connect(&config.database_url, config.max_connections).await?;
        Ok(Self::from_pool(Arc::new(pool)))
    }

    /// Open a private in-memory store.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Connection` if the pool cannot be opened.
    pub async fn in_memory() -> Result<Self> {
        let pool = db::connect_memory().await?;
        Ok(Self::from_pool(Arc::new(pool)))
    }

    /// Wrap an already-bootstrapped pool.
    #[must_use]
    pub fn from_pool(db: Arc<Database>) -> Self {
        let players = PlayerRepo::new(Arc::clone(&db));
        Self { db, players }
    }

    /// Underlying pool, for callers that need direct row access.
    #[must_use]
    pub fn pool(&self) -> &Arc<Database> {
        &self.db
    }

    /// Fetch `user_id`, inserting a default row if the player is new.
    ///
    /// After this returns successfully a row for `user_id` exists.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Uninitialized` after [`close`](Self::close),
    /// `AppError::MalformedData` if the stored row cannot be decoded, or
    /// `AppError::Connection` if the database is unreachable.
    pub async fn get_player(&self, user_id: &str) -> Result<PlayerRecord> {
        self.players.get_or_create(user_id).await
    }

    /// Fetch `user_id` without creating it.
    ///
    /// # Errors
    ///
    /// Same as [`get_player`](Self::get_player).
    pub async fn get_existing(&self, user_id: &str) -> Result<Option<PlayerRecord>> {
        self.players.get_existing(user_id).await
    }

    /// Insert a default row for `user_id` if absent; `true` if created.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Uninitialized` after [`close`](Self::close), or
    /// `AppError::Connection` if the database is unreachable.
    pub async fn create_if_absent(&self, user_id: &str) -> Result<bool> {
        self.players.create_if_absent(user_id).await
    }

    /// Store `record` for `user_id`, replacing every field of any existing row.
    ///
    /// Concurrent updates for the same player are last-write-wins.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Uninitialized` after [`close`](Self::close), or
    /// `AppError::Connection` / `AppError::Db` if the upsert fails.
    pub async fn update_player(&self, user_id: &str, record: &PlayerRecord) -> Result<()> {
        self.players.upsert(user_id, record).await
    }

    /// Load every player keyed by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Uninitialized` after [`close`](Self::close),
    /// `AppError::MalformedData` if any row cannot be decoded, or
    /// `AppError::Connection` if the database is unreachable.
    pub async fn load_all_players(&self) -> Result<BTreeMap<String, PlayerRecord>> {
        self.players.list_all().await
    }

    /// Up to `limit` players ordered by acorns, richest first.
    ///
    /// # Errors
    ///
    /// Same as [`load_all_players`](Self::load_all_players).
    pub async fn leaderboard(&self, limit: u32) -> Result<Vec<(String, PlayerRecord)>> {
        self.players.top_by_acorns(limit).await
    }

    /// Close the pool, waiting for checked-out connections to be returned.
    pub async fn close(&self) {
        if !self.db.is_closed() {
            self.db.close().await;
            info!("database pool closed");
        }
    }

    /// Whether [`close`](Self::close) has been called on this pool.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.db.is_closed()
    }
}
