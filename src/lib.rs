#![forbid(unsafe_code)]

//! Player progress persistence for the Squirrel Catcher bot.
//!
//! [`PlayerStore`] maps [`PlayerRecord`] values to rows of a single
//! `players` table, creating default rows on first read and upserting on
//! save.

pub mod config;
pub mod errors;
pub mod models;
pub mod persistence;
pub mod store;

pub use config::StoreConfig;
pub use errors::{AppError, Result};
pub use models::PlayerRecord;
pub use store::PlayerStore;
