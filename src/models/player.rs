//! Player progress record and boundary conversion helpers.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{AppError, Result};

/// Offset-carrying layouts beyond strict RFC 3339, converted to UTC.
const AWARE_LAYOUTS: [&str; 8] = [
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%d %H:%M%z",
];

/// Naive date-time layouts accepted for `last_daily`, interpreted as UTC.
const NAIVE_LAYOUTS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Per-player progress persisted in the `players` table.
///
/// The owning `user_id` is not part of the record; it is the key under
/// which the record is stored and is passed separately to every store
/// operation. Missing keys in external JSON input fall back to the same
/// defaults the table uses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "snake_case")]
pub struct PlayerRecord {
    /// Base currency.
    pub acorns: i64,
    /// Tier-2 currency.
    pub silver_acorns: i64,
    /// Tier-3 currency.
    pub emerald_acorns: i64,
    /// Tier-4 currency.
    pub golden_acorns: i64,
    /// Lifetime catch count.
    pub total_catches: i64,
    /// Lifetime junk catch count.
    pub junk_catches: i64,
    /// Player level; starts at 1.
    pub level: i64,
    /// Experience points toward the next level.
    pub xp: i64,
    /// Last daily reward claim, always held in UTC.
    #[serde(
        serialize_with = "serialize_last_daily",
        deserialize_with = "deserialize_last_daily"
    )]
    pub last_daily: Option<DateTime<Utc>>,
    /// Species name to catch count tally.
    pub catches: BTreeMap<String, i64>,
}

impl Default for PlayerRecord {
    fn default() -> Self {
        Self {
            acorns: 0,
            silver_acorns: 0,
            emerald_acorns: 0,
            golden_acorns: 0,
            total_catches: 0,
            junk_catches: 0,
            level: 1,
            xp: 0,
            last_daily: None,
            catches: BTreeMap::new(),
        }
    }
}

impl PlayerRecord {
    /// Parse a caller-supplied JSON mapping into a record.
    ///
    /// Absent keys take their defaults and unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` if the JSON is malformed, a field
    /// has the wrong type, or `last_daily` is not a recognizable timestamp.
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw)
            .map_err(|err| AppError::InvalidInput(format!("invalid player record: {err}")))
    }

    /// Render the record as the caller-facing JSON mapping.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|err| AppError::InvalidInput(format!("serialize player record: {err}")))
    }

    /// Set `last_daily` from a raw timestamp string.
    ///
    /// An empty string clears the field.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` if the string is not a recognizable
    /// timestamp.
    pub fn set_last_daily_str(&mut self, raw: &str) -> Result<()> {
        self.last_daily = if raw.trim().is_empty() {
            None
        } else {
            Some(parse_timestamp(raw)?)
        };
        Ok(())
    }
}

/// Parse an ISO-8601 timestamp into UTC.
///
/// Strings carrying an offset are converted to UTC. Strings without one
/// (`2024-01-15T10:30:00`, `2024-01-15 10:30:00.25`) are taken to already be
/// UTC, and a bare date resolves to midnight UTC.
///
/// # Errors
///
/// Returns `AppError::InvalidInput` if no accepted layout matches.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(aware) = DateTime::parse_from_rfc3339(raw) {
        return Ok(aware.with_timezone(&Utc));
    }
    for layout in AWARE_LAYOUTS {
        if let Ok(aware) = DateTime::parse_from_str(raw, layout) {
            return Ok(aware.with_timezone(&Utc));
        }
    }

    for layout in NAIVE_LAYOUTS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, layout) {
            return Ok(naive.and_utc());
        }
    }

    if let Some(midnight) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(midnight.and_utc());
    }

    Err(AppError::InvalidInput(format!("unrecognized timestamp: {raw}")))
}

/// Render `last_daily` the way it is stored: RFC 3339 with a `+00:00` offset.
#[allow(clippy::ref_option)]
fn serialize_last_daily<S>(
    value: &Option<DateTime<Utc>>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(ts) => serializer.serialize_some(&ts.to_rfc3339()),
        None => serializer.serialize_none(),
    }
}

fn deserialize_last_daily<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => parse_timestamp(text)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
