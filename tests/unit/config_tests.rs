use std::io::Write;

use squirrel_store::{config::StoreConfig, AppError};

#[test]
fn parses_full_config() {
    let config = StoreConfig::from_toml_str(
        r#"
database_url = "sqlite://squirrel.db"
max_connections = 8
"#,
    )
    .expect("valid config");

    assert_eq!(config.database_url, "sqlite://squirrel.db");
    assert_eq!(config.max_connections, 8);
}

#[test]
fn max_connections_defaults_to_five() {
    let config = StoreConfig::from_toml_str(r#"database_url = "sqlite::memory:""#).expect("valid");
    assert_eq!(config.max_connections, 5);
}

#[test]
fn missing_database_url_is_rejected() {
    let err = StoreConfig::from_toml_str("max_connections = 2").unwrap_err();
    assert!(matches!(err, AppError::Config(_)));
}

#[test]
fn empty_database_url_is_rejected() {
    let err = StoreConfig::from_toml_str(r#"database_url = "  ""#).unwrap_err();
    assert!(matches!(err, AppError::Config(msg) if msg.contains("database_url")));
}

#[test]
fn zero_max_connections_is_rejected() {
    let err = StoreConfig::from_toml_str(
        r#"
database_url = "sqlite://squirrel.db"
max_connections = 0
"#,
    )
    .unwrap_err();
    assert!(matches!(err, AppError::Config(msg) if msg.contains("max_connections")));
}

#[test]
fn from_url_rejects_empty() {
    assert!(matches!(
        StoreConfig::from_url("").unwrap_err(),
        AppError::Config(_)
    ));
}

#[test]
fn load_from_path_reads_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, r#"database_url = "sqlite://from-file.db""#).expect("write");

    let config = StoreConfig::load_from_path(file.path()).expect("load");
    assert_eq!(config.database_url, "sqlite://from-file.db");
}

#[test]
fn load_from_missing_path_is_config_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = StoreConfig::load_from_path(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, AppError::Config(msg) if msg.contains("failed to read config")));
}

#[test]
fn override_replaces_url_but_ignores_empty() {
    let mut config = StoreConfig::from_url("sqlite://a.db").expect("valid");

    config.override_database_url(String::new());
    assert_eq!(config.database_url, "sqlite://a.db");

    config.override_database_url("sqlite://b.db".into());
    assert_eq!(config.database_url, "sqlite://b.db");
}
