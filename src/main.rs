#![forbid(unsafe_code)]

//! `squirrel-store` — admin CLI for the Squirrel Catcher player database.
//!
//! Opens the configured database, applies the schema, and runs one
//! subcommand. Record output goes to stdout as JSON; logs go to stderr.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use squirrel_store::config::DATABASE_URL_ENV;
use squirrel_store::{AppError, PlayerRecord, PlayerStore, Result, StoreConfig};

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "squirrel-store", about = "Squirrel Catcher player database", version, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Database URL; overrides both the config file and `DATABASE_URL`.
    #[arg(long)]
    database_url: Option<String>,

    /// Log output format (text or json).
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create the database and the players table.
    Init,

    /// Print a player, creating a default row if the player is new.
    Show {
        /// Player identifier.
        user_id: String,
    },

    /// Replace a player's record with the given JSON mapping.
    Set {
        /// Player identifier.
        user_id: String,
        /// JSON record; missing keys take their defaults.
        record: String,
    },

    /// Print every player as a JSON object keyed by user ID.
    List,

    /// Print players ordered by acorns, one JSON line each.
    Leaderboard {
        /// Maximum number of players to print.
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.log_format)?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::Config(format!("failed to build tokio runtime: {err}")))?
        .block_on(run(args))
}

async fn run(args: Cli) -> Result<()> {
    let config = resolve_config(args.config.as_deref(), args.database_url)?;
    let store = PlayerStore::from_config(&config).await?;

    let outcome = execute(&store, args.command).await;
    store.close().await;
    outcome
}

/// Layer configuration sources: file, then `DATABASE_URL`, then the flag.
fn resolve_config(path: Option<&Path>, url_flag: Option<String>) -> Result<StoreConfig> {
    let mut config = match (path, &url_flag) {
        (Some(path), _) => StoreConfig::load_from_path(path)?,
        (None, Some(url)) => StoreConfig::from_url(url.clone())?,
        (None, None) => {
            let url = std::env::var(DATABASE_URL_ENV).map_err(|_| {
                AppError::Config(format!(
                    "no database configured: pass --config, --database-url, or set {DATABASE_URL_ENV}"
                ))
            })?;
            StoreConfig::from_url(url)?
        }
    };

    config.apply_env_overrides();
    if let Some(url) = url_flag {
        config.override_database_url(url);
    }
    Ok(config)
}

async fn execute(store: &PlayerStore, command: Command) -> Result<()> {
    match command {
        Command::Init => {
            info!("database initialized");
        }
        Command::Show { user_id } => {
            let record = store.get_player(&user_id).await?;
            emit(&record.to_json()?)?;
        }
        Command::Set { user_id, record } => {
            let record = PlayerRecord::from_json(&record)?;
            store.update_player(&user_id, &record).await?;
            info!(%user_id, "player updated");
            emit(&store.get_player(&user_id).await?.to_json()?)?;
        }
        Command::List => {
            let players = store.load_all_players().await?;
            let rendered = serde_json::to_string(&players)
                .map_err(|err| AppError::InvalidInput(format!("serialize players: {err}")))?;
            emit(&rendered)?;
        }
        Command::Leaderboard { limit } => {
            for (rank, (user_id, record)) in store.leaderboard(limit).await?.iter().enumerate() {
                let line = serde_json::json!({
                    "rank": rank + 1,
                    "user_id": user_id,
                    "acorns": record.acorns,
                    "level": record.level,
                    "total_catches": record.total_catches,
                });
                emit(&line.to_string())?;
            }
        }
    }
    Ok(())
}

fn emit(line: &str) -> Result<()> {
    let mut out = std::io::stdout().lock();
    writeln!(out, "{line}").map_err(|err| AppError::Io(format!("failed to write output: {err}")))
}

fn init_tracing(log_format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    match log_format {
        LogFormat::Text => subscriber
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
        LogFormat::Json => subscriber
            .json()
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
    }

    Ok(())
}
