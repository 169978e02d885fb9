//! Player repository for `SQLite` persistence.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use crate::models::player::PlayerRecord;
use crate::{AppError, Result};

use super::db::Database;

/// Repository wrapper around `SQLite` for player records.
#[derive(Clone)]
pub struct PlayerRepo {
    db: Arc<Database>,
}

/// Internal row struct for `SQLite` deserialization.
#[derive(sqlx::FromRow)]
struct PlayerRow {
    user_id: String,
    acorns: i64,
    silver_acorns: i64,
    emerald_acorns: i64,
    golden_acorns: i64,
    total_catches: i64,
    junk_catches: i64,
    level: i64,
    xp: i64,
    last_daily: Option<String>,
    catches: String,
}

impl PlayerRow {
    /// Convert a database row into its key and domain record.
    fn into_entry(self) -> Result<(String, PlayerRecord)> {
        let last_daily = self
            .last_daily
            .as_deref()
            .map(chrono::DateTime::parse_from_rfc3339)
            .transpose()
            .map_err(|e| {
                AppError::MalformedData(format!("invalid last_daily for {}: {e}", self.user_id))
            })?
            .map(|ts| ts.with_timezone(&Utc));
        let catches = serde_json::from_str(&self.catches).map_err(|e| {
            AppError::MalformedData(format!("invalid catches for {}: {e}", self.user_id))
        })?;

        let record = PlayerRecord {
            acorns: self.acorns,
            silver_acorns: self.silver_acorns,
            emerald_acorns: self.emerald_acorns,
            golden_acorns: self.golden_acorns,
            total_catches: self.total_catches,
            junk_catches: self.junk_catches,
            level: self.level,
            xp: self.xp,
            last_daily,
            catches,
        };
        Ok((self.user_id, record))
    }

    fn into_record(self) -> Result<PlayerRecord> {
        self.into_entry().map(|(_, record)| record)
    }
}

impl PlayerRepo {
    /// Create a new repository instance.
    #[must_use]
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Retrieve a player without creating one.
    ///
    /// # Errors
    ///
    /// Returns `AppError::MalformedData` if the stored row cannot be decoded,
    /// or a connectivity error if the query fails.
    pub async fn get_existing(&self, user_id: &str) -> Result<Option<PlayerRecord>> {
        let row: Option<PlayerRow> = sqlx::query_as(
            "SELECT user_id, acorns, silver_acorns, emerald_acorns, golden_acorns,
                    total_catches, junk_catches, level, xp, last_daily, catches
             FROM players WHERE user_id = ?1",
        )
        .bind(user_id)
        .fetch_optional(self.db.as_ref())
        .await?;

        row.map(PlayerRow::into_record).transpose()
    }

    /// Insert a default row for `user_id` unless one already exists.
    ///
    /// Returns `true` if this call created the row.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` or a connectivity error if the insert fails.
    pub async fn create_if_absent(&self, user_id: &str) -> Result<bool> {
        let result =
            sqlx::query("INSERT INTO players (user_id) VALUES (?1) ON CONFLICT(user_id) DO NOTHING")
                .bind(user_id)
                .execute(self.db.as_ref())
                .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Retrieve a player, creating a default row first if none exists.
    ///
    /// # Errors
    ///
    /// Returns `AppError::MalformedData` if the stored row cannot be decoded,
    /// or a connectivity error if any statement fails.
    pub async fn get_or_create(&self, user_id: &str) -> Result<PlayerRecord> {
        if let Some(record) = self.get_existing(user_id).await? {
            return Ok(record);
        }

        if self.create_if_absent(user_id).await? {
            debug!(user_id, "created default player");
            return Ok(PlayerRecord::default());
        }

        // Another caller created the row between the read and the insert.
        self.get_existing(user_id)
            .await?
            .ok_or_else(|| AppError::Db(format!("player {user_id} missing after insert")))
    }

    /// Insert or fully replace the row for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` if `catches` cannot be serialized,
    /// or `AppError::Db` / a connectivity error if the upsert fails.
    pub async fn upsert(&self, user_id: &str, record: &PlayerRecord) -> Result<()> {
        let last_daily = record.last_daily.map(|ts| ts.to_rfc3339());
        let catches = serde_json::to_string(&record.catches)
            .map_err(|e| AppError::InvalidInput(format!("serialize catches: {e}")))?;

        sqlx::query(
            "INSERT INTO players (user_id, acorns, silver_acorns, emerald_acorns, golden_acorns,
                                  total_catches, junk_catches, level, xp, last_daily, catches)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
             ON CONFLICT(user_id) DO UPDATE SET
                 acorns = excluded.acorns,
                 silver_acorns = excluded.silver_acorns,
                 emerald_acorns = excluded.emerald_acorns,
                 golden_acorns = excluded.golden_acorns,
                 total_catches = excluded.total_catches,
                 junk_catches = excluded.junk_catches,
                 level = excluded.level,
                 xp = excluded.xp,
                 last_daily = excluded.last_daily,
                 catches = excluded.catches",
        )
        .bind(user_id)
        .bind(record.acorns)
        .bind(record.silver_acorns)
        .bind(record.emerald_acorns)
        .bind(record.golden_acorns)
        .bind(record.total_catches)
        .bind(record.junk_catches)
        .bind(record.level)
        .bind(record.xp)
        .bind(&last_daily)
        .bind(&catches)
        .execute(self.db.as_ref())
        .await?;

        debug!(user_id, "player upserted");
        Ok(())
    }

    /// Load every stored player keyed by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::MalformedData` if any row cannot be decoded, or a
    /// connectivity error if the query fails.
    pub async fn list_all(&self) -> Result<BTreeMap<String, PlayerRecord>> {
        let rows: Vec<PlayerRow> = sqlx::query_as(
            "SELECT user_id, acorns, silver_acorns, emerald_acorns, golden_acorns,
                    total_catches, junk_catches, level, xp, last_daily, catches
             FROM players",
        )
        .fetch_all(self.db.as_ref())
        .await?;

        rows.into_iter().map(PlayerRow::into_entry).collect()
    }

    /// List up to `limit` players ordered by acorns, richest first.
    ///
    /// Ties are broken by `user_id` so the order is stable.
    ///
    /// # Errors
    ///
    /// Returns `AppError::MalformedData` if any row cannot be decoded, or a
    /// connectivity error if the query fails.
    pub async fn top_by_acorns(&self, limit: u32) -> Result<Vec<(String, PlayerRecord)>> {
        let rows: Vec<PlayerRow> = sqlx::query_as(
            "SELECT user_id, acorns, silver_acorns, emerald_acorns, golden_acorns,
                    total_catches, junk_catches, level, xp, last_daily, catches
             FROM players
             ORDER BY acorns DESC, user_id ASC
             LIMIT ?1",
        )
        .bind(i64::from(limit))
        .fetch_all(self.db.as_ref())
        .await?;

        rows.into_iter().map(PlayerRow::into_entry).collect()
    }
}
