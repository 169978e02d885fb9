//! Persistence layer modules.

pub mod db;
pub mod player_repo;
pub mod schema;
