//! Error types shared across the crate.

use std::fmt::{Display, Formatter};

/// `SQLite` primary result code for a disk I/O failure.
const SQLITE_IOERR: i32 = 10;
/// `SQLite` primary result code for a database file that cannot be opened.
const SQLITE_CANTOPEN: i32 = 14;

/// Shared crate result type.
pub type Result<T> = std::result::Result<T, AppError>;

/// Error enumeration covering every player store failure mode.
#[derive(Debug)]
pub enum AppError {
    /// Configuration parsing or validation failure.
    Config(String),
    /// The backing database could not be reached or opened.
    Connection(String),
    /// An operation was issued on a store whose pool has been closed.
    Uninitialized(String),
    /// Stored data could not be decoded back into a player record.
    MalformedData(String),
    /// External input rejected at the record boundary.
    InvalidInput(String),
    /// Any other statement failure reported by the database.
    Db(String),
    /// File-system or I/O operation failure.
    Io(String),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Connection(msg) => write!(f, "connection: {msg}"),
            Self::Uninitialized(msg) => write!(f, "uninitialized: {msg}"),
            Self::MalformedData(msg) => write!(f, "malformed data: {msg}"),
            Self::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            Self::Db(msg) => write!(f, "db: {msg}"),
            Self::Io(msg) => write!(f, "io: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("invalid config: {err}"))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolClosed => Self::Uninitialized("connection pool is closed".into()),
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::WorkerCrashed => Self::Connection(err.to_string()),
            sqlx::Error::Database(ref db_err)
                if db_err.code().is_some_and(|code| is_unreachable_code(&code)) =>
            {
                Self::Connection(err.to_string())
            }
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                Self::MalformedData(err.to_string())
            }
            other => Self::Db(other.to_string()),
        }
    }
}

/// Whether an `SQLite` (extended) result code means the file is unreachable.
fn is_unreachable_code(code: &str) -> bool {
    code.parse::<i32>()
        .is_ok_and(|code| matches!(code & 0xff, SQLITE_IOERR | SQLITE_CANTOPEN))
}
