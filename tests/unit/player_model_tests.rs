//! Unit tests for `PlayerRecord` boundary conversion.
//!
//! Validates:
//! - Defaults for a missing or partial JSON mapping
//! - `last_daily` accepts offset, naive, empty, and null inputs
//! - Caller-facing JSON carries exactly the record keys

use chrono::{TimeZone, Utc};

use squirrel_store::models::{parse_timestamp, PlayerRecord};
use squirrel_store::AppError;

// ─── Defaults ─────────────────────────────────────────────────────────

#[test]
fn empty_mapping_yields_defaults() {
    let record = PlayerRecord::from_json("{}").expect("parse");
    assert_eq!(record, PlayerRecord::default());
    assert_eq!(record.level, 1);
}

#[test]
fn partial_mapping_fills_remaining_defaults() {
    let record =
        PlayerRecord::from_json(r#"{"acorns": 5, "catches": {"chipmunk": 2}}"#).expect("parse");

    assert_eq!(record.acorns, 5);
    assert_eq!(record.silver_acorns, 0);
    assert_eq!(record.emerald_acorns, 0);
    assert_eq!(record.golden_acorns, 0);
    assert_eq!(record.total_catches, 0);
    assert_eq!(record.junk_catches, 0);
    assert_eq!(record.level, 1);
    assert_eq!(record.xp, 0);
    assert_eq!(record.last_daily, None);
    assert_eq!(record.catches.get("chipmunk"), Some(&2));
    assert_eq!(record.catches.len(), 1);
}

#[test]
fn unknown_keys_are_ignored() {
    let record =
        PlayerRecord::from_json(r#"{"user_id": "alice", "favorite_tree": "oak", "xp": 40}"#)
            .expect("parse");
    assert_eq!(record.xp, 40);
}

// ─── last_daily ───────────────────────────────────────────────────────

#[test]
fn naive_last_daily_is_stored_as_utc() {
    let record =
        PlayerRecord::from_json(r#"{"last_daily": "2024-01-15T10:30:00"}"#).expect("parse");
    let expected = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).single();
    assert_eq!(record.last_daily, expected);
}

#[test]
fn aware_and_naive_last_daily_are_equivalent() {
    let naive = PlayerRecord::from_json(r#"{"last_daily": "2024-01-15T10:30:00"}"#).expect("naive");
    let aware =
        PlayerRecord::from_json(r#"{"last_daily": "2024-01-15T10:30:00+00:00"}"#).expect("aware");
    let zulu = PlayerRecord::from_json(r#"{"last_daily": "2024-01-15T10:30:00Z"}"#).expect("zulu");
    assert_eq!(naive.last_daily, aware.last_daily);
    assert_eq!(aware.last_daily, zulu.last_daily);
}

#[test]
fn offset_last_daily_is_normalized_to_utc() {
    let record =
        PlayerRecord::from_json(r#"{"last_daily": "2024-01-15T05:30:00-05:00"}"#).expect("parse");
    let expected = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).single();
    assert_eq!(record.last_daily, expected);
}

#[test]
fn null_and_empty_last_daily_are_none() {
    let null = PlayerRecord::from_json(r#"{"last_daily": null}"#).expect("null");
    let empty = PlayerRecord::from_json(r#"{"last_daily": ""}"#).expect("empty");
    assert_eq!(null.last_daily, None);
    assert_eq!(empty.last_daily, None);
}

#[test]
fn unparseable_last_daily_is_invalid_input() {
    let err = PlayerRecord::from_json(r#"{"last_daily": "last tuesday"}"#).unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)), "got {err:?}");
}

#[test]
fn space_separated_and_fractional_timestamps_parse() {
    let spaced = parse_timestamp("2024-01-15 10:30:00").expect("spaced");
    let fractional = parse_timestamp("2024-01-15T10:30:00.250").expect("fractional");
    assert_eq!(spaced, Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap());
    assert_eq!(fractional.timestamp_subsec_millis(), 250);
}

#[test]
fn bare_date_resolves_to_midnight_utc() {
    let parsed = parse_timestamp("2024-01-15").expect("date");
    assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap());
}

#[test]
fn set_last_daily_str_clears_on_empty() {
    let mut record = PlayerRecord::default();
    record.set_last_daily_str("2024-01-15T10:30:00").expect("set");
    assert!(record.last_daily.is_some());

    record.set_last_daily_str("").expect("clear");
    assert!(record.last_daily.is_none());
}

// ─── Malformed input ─────────────────────────────────────────────────

#[test]
fn wrong_field_type_is_invalid_input() {
    let err = PlayerRecord::from_json(r#"{"acorns": "plenty"}"#).unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));
}

#[test]
fn non_mapping_catches_is_invalid_input() {
    let err = PlayerRecord::from_json(r#"{"catches": ["chipmunk"]}"#).unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));
}

// ─── Caller-facing JSON ──────────────────────────────────────────────

#[test]
fn to_json_emits_exactly_the_record_keys() {
    let record = PlayerRecord::default();
    let value: serde_json::Value =
        serde_json::from_str(&record.to_json().expect("render")).expect("json");
    let object = value.as_object().expect("object");

    let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        [
            "acorns",
            "catches",
            "emerald_acorns",
            "golden_acorns",
            "junk_catches",
            "last_daily",
            "level",
            "silver_acorns",
            "total_catches",
            "xp",
        ]
    );
    assert!(object["last_daily"].is_null());
    assert_eq!(object["catches"], serde_json::json!({}));
}

#[test]
fn rendered_last_daily_parses_back_to_same_instant() {
    let mut record = PlayerRecord::default();
    record.last_daily = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).single();

    let reparsed = PlayerRecord::from_json(&record.to_json().expect("render")).expect("parse");
    assert_eq!(reparsed, record);
}

#[test]
fn minute_precision_with_offset_matches_naive_form() {
    let expected = Utc.with_ymd_and_hms(2024, 1, 15, 8, 30, 0).unwrap();
    for raw in [
        "2024-01-15T10:30+02:00",
        "2024-01-15 10:30+02:00",
        "2024-01-15T10:30+0200",
        "2024-01-15 10:30+0200",
    ] {
        assert_eq!(parse_timestamp(raw).expect(raw), expected, "{raw}");
    }
    assert_eq!(
        parse_timestamp("2024-01-15T08:30").expect("naive minutes"),
        expected
    );
}

#[test]
fn offset_without_colon_is_normalized_to_utc() {
    let expected = Utc.with_ymd_and_hms(2024, 1, 15, 8, 30, 0).unwrap();
    assert_eq!(
        parse_timestamp("2024-01-15T10:30:00+0200").expect("T separator"),
        expected
    );
    assert_eq!(
        parse_timestamp("2024-01-15 10:30:00.000+0200").expect("space separator"),
        expected
    );
    assert_eq!(
        parse_timestamp("2024-01-15 10:30:00+02:00").expect("space with colon"),
        expected
    );
}

#[test]
fn rendered_last_daily_uses_explicit_utc_offset() {
    let record = PlayerRecord::from_json(r#"{"last_daily": "2024-01-15T10:30:00Z"}"#)
        .expect("parse");
    let value: serde_json::Value =
        serde_json::from_str(&record.to_json().expect("render")).expect("json");
    assert_eq!(value["last_daily"], "2024-01-15T10:30:00+00:00");
}
