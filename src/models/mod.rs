//! Domain model module declarations.

pub mod player;

pub use player::{parse_timestamp, PlayerRecord};
