use lpm::core::config::{Config, ThemeMode};
use lpm::core::process_monitor::SortMode;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.interval_secs(), 2);
    assert_eq!(config.sort_mode, SortMode::ByCpu);
    assert_eq!(config.theme, ThemeMode::Light);
    assert!(config.history_capacity.is_none());
}

#[test]
fn test_config_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("config.json");

    let config = Config {
        interval_secs: 5,
        sort_mode: SortMode::ByMemory,
        theme: ThemeMode::Dark,
        history_capacity: Some(600),
    };
    config.save_to(&path).unwrap();

    assert_eq!(Config::load_from(&path).unwrap(), config);
}

#[test]
fn test_config_load_missing_returns_default() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::load_from(&temp_dir.path().join("absent.json")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_config_corrupt_or_empty_file_returns_default() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");

    fs::write(&path, "").unwrap();
    assert_eq!(Config::load_from(&path).unwrap(), Config::default());

    fs::write(&path, "{ not json").unwrap();
    assert_eq!(Config::load_from(&path).unwrap(), Config::default());
}

#[test]
fn test_config_partial_file_fills_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    fs::write(&path, r#"{ "theme": "dark" }"#).unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.theme, ThemeMode::Dark);
    assert_eq!(config.interval_secs(), 2);
    assert_eq!(config.sort_mode, SortMode::ByCpu);
}

#[test]
fn test_config_serialized_names() {
    let config = Config {
        sort_mode: SortMode::ByMemory,
        ..Default::default()
    };
    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains(r#""sort_mode":"by_memory""#));
    assert!(json.contains(r#""theme":"light""#));
}
