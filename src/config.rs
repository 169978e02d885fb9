//! Store configuration parsing, validation, and environment overrides.

use std::env;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::{AppError, Result};

/// Environment variable that overrides `database_url` from the config file.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

fn default_max_connections() -> u32 {
    5
}

/// Player store configuration parsed from `config.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct StoreConfig {
    /// `SQLite` connection URL, e.g. `sqlite://squirrel.db`.
    pub database_url: String,
    /// Upper bound on pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl StoreConfig {
    /// Build a configuration for `database_url` with default pool sizing.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the URL is empty.
    pub fn from_url(database_url: impl Into<String>) -> Result<Self> {
        let config = Self {
            database_url: database_url.into(),
            max_connections: default_max_connections(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Load and validate configuration from a TOML file path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or contains
    /// invalid TOML, or if validation fails.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("failed to read config: {err}")))?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Replace `database_url` with the `DATABASE_URL` environment variable
    /// when it is set and non-empty.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = env::var(DATABASE_URL_ENV) {
            self.override_database_url(url);
        }
    }

    /// Replace `database_url` with `url` unless `url` is empty.
    pub fn override_database_url(&mut self, url: String) {
        if url.is_empty() {
            return;
        }
        if url != self.database_url {
            warn!(
                configured = %self.database_url,
                "database_url overridden"
            );
        }
        self.database_url = url;
    }

    fn validate(&self) -> Result<()> {
        if self.database_url.trim().is_empty() {
            return Err(AppError::Config("database_url must not be empty".into()));
        }

        if self.max_connections == 0 {
            return Err(AppError::Config(
                "max_connections must be greater than zero".into(),
            ));
        }

        Ok(())
    }
}
