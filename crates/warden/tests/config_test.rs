//! Tests for layered configuration loading.

use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;
use warden::{ConfigErrorKind, WardenConfig, WardenErrorKind};

fn toml_file(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_bundled_defaults_match_built_in_defaults() {
    let config = WardenConfig::layered(&[]).unwrap();
    assert_eq!(config, WardenConfig::default());
    assert_eq!(config.store().url(), "redis://127.0.0.1:6379/0");
    assert_eq!(*config.backoff().max_attempts(), 5);
}

#[test]
fn test_from_file_fills_missing_keys() {
    let file = toml_file(
        r#"
        [store]
        host = "cache.internal"
        tls = true

        [backoff]
        max_attempts = 3
        "#,
    );

    let config = WardenConfig::from_file(file.path()).unwrap();

    assert_eq!(config.store().url(), "rediss://cache.internal:6379/0");
    assert_eq!(*config.store().pool_size(), 20);
    assert_eq!(*config.backoff().max_attempts(), 3);
    assert_eq!(*config.backoff().base_delay_ms(), 1_000);
    assert_eq!(config.http(), &Default::default());
}

#[test]
fn test_later_layers_win() {
    let home = toml_file(
        r#"
        [store]
        host = "home.internal"
        port = 6380

        [http]
        timeout_ms = 5000
        "#,
    );
    let local = toml_file(
        r#"
        [store]
        host = "local.internal"
        "#,
    );

    let config =
        WardenConfig::layered(&[home.path().to_path_buf(), local.path().to_path_buf()]).unwrap();

    assert_eq!(config.store().host(), "local.internal");
    assert_eq!(*config.store().port(), 6380);
    assert_eq!(*config.http().timeout_ms(), 5_000);
}

#[test]
fn test_missing_layers_are_skipped() {
    let config =
        WardenConfig::layered(&[PathBuf::from("/nonexistent/warden/warden.toml")]).unwrap();
    assert_eq!(config, WardenConfig::default());
}

fn config_kind(err: &warden::WardenError) -> &ConfigErrorKind {
    match err.kind() {
        WardenErrorKind::Config(inner) => inner.kind(),
        other => panic!("expected config error, got {:?}", other),
    }
}

#[test]
fn test_missing_file_is_unreadable() {
    let err = WardenConfig::from_file("/nonexistent/warden.toml").unwrap_err();
    let ConfigErrorKind::Unreadable { source, .. } = config_kind(&err) else {
        panic!("expected unreadable source, got {:?}", err);
    };
    assert_eq!(source, "/nonexistent/warden.toml");
}

#[test]
fn test_malformed_toml_is_unreadable() {
    let file = toml_file("[store\nhost = ");

    let err = WardenConfig::layered(&[file.path().to_path_buf()]).unwrap_err();
    assert!(matches!(config_kind(&err), ConfigErrorKind::Unreadable { .. }));
}

#[test]
fn test_wrong_type_is_invalid() {
    let file = toml_file(
        r#"
        [store]
        port = "not a port"
        "#,
    );

    let err = WardenConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(config_kind(&err), ConfigErrorKind::Invalid(_)));
}
