//! `SQLite` schema bootstrap logic.
//!
//! The table definition uses `CREATE TABLE IF NOT EXISTS` and is safe to
//! re-run on every process start.

use tracing::info;

use crate::Result;

use super::db::Database;

/// Create the `players` table if it does not exist yet.
///
/// `last_daily` holds RFC 3339 UTC text. `catches` holds a JSON object and
/// is rejected by `SQLite` if it is not valid JSON.
///
/// # Errors
///
/// Returns `AppError::Db` if the DDL statement fails.
pub async fn bootstrap_schema(pool: &Database) -> Result<()> {
    let ddl = r"
CREATE TABLE IF NOT EXISTS players (
    user_id         TEXT PRIMARY KEY NOT NULL,
    acorns          INTEGER NOT NULL DEFAULT 0,
    silver_acorns   INTEGER NOT NULL DEFAULT 0,
    emerald_acorns  INTEGER NOT NULL DEFAULT 0,
    golden_acorns   INTEGER NOT NULL DEFAULT 0,
    total_catches   INTEGER NOT NULL DEFAULT 0,
    junk_catches    INTEGER NOT NULL DEFAULT 0,
    level           INTEGER NOT NULL DEFAULT 1,
    xp              INTEGER NOT NULL DEFAULT 0,
    last_daily      TEXT,
    catches         TEXT NOT NULL DEFAULT '{}' CHECK (json_valid(catches))
);
";

    sqlx::raw_sql(ddl).execute(pool).await?;
    info!("players schema ready");
    Ok(())
}
