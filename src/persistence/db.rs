//! `SQLite` connection pool setup and schema bootstrap.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

use crate::{AppError, Result};

use super::schema;

/// Alias for the shared `SQLite` pool.
pub type Database = SqlitePool;

/// Open a pool against `database_url` and apply the schema.
///
/// The database file is created if it does not exist. An in-memory URL is
/// pinned to a single long-lived connection, since every `SQLite` memory
/// connection is its own database.
///
/// # Errors
///
/// Returns `AppError::Config` if the URL cannot be parsed,
/// `AppError::Connection` if the database cannot be opened, or
/// `AppError::Db` if the schema cannot be applied.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<Database> {
    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|err| AppError::Config(format!("invalid database url: {err}")))?
        .create_if_missing(true);

    let pool = if database_url.contains(":memory:") {
        memory_pool_options().connect_with(options).await
    } else {
        SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
    }
    .map_err(|err| AppError::Connection(format!("failed to open database: {err}")))?;

    schema::bootstrap_schema(&pool).await?;
    info!(max_connections, "database pool opened");
    Ok(pool)
}

/// Open a private in-memory database with the schema applied.
///
/// # Errors
///
/// Returns `AppError::Connection` if the pool cannot be opened or
/// `AppError::Db` if the schema cannot be applied.
pub async fn connect_memory() -> Result<Database> {
    connect("sqlite::memory:", 1).await
}

fn memory_pool_options() -> SqlitePoolOptions {
    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
}
