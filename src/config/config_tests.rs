use super::*;
use std::fs;

#[test]
fn test_default_config() {
    let config = StoreConfig::default();
    assert_eq!(config.data_dir, "~/.hotclip/db");
    assert_eq!(config.max_history_entries, DEFAULT_MAX_HISTORY_ENTRIES);
    assert_eq!(config.max_search_results, DEFAULT_MAX_SEARCH_RESULTS);
}

#[test]
fn test_data_dir_is_tilde_expanded() {
    let config = StoreConfig::default();
    let path = config.data_dir_path();
    assert!(!path.to_string_lossy().starts_with('~'));
    assert!(path.ends_with(".hotclip/db"));
}

#[test]
fn test_partial_json_uses_field_defaults() {
    let config: StoreConfig = serde_json::from_str(r#"{"maxHistoryEntries": 50}"#).unwrap();
    assert_eq!(config.max_history_entries, 50);
    assert_eq!(config.data_dir, "~/.hotclip/db");
    assert_eq!(config.max_search_results, DEFAULT_MAX_SEARCH_RESULTS);
}

#[test]
fn test_config_serialization_is_camel_case() {
    let json = serde_json::to_string(&StoreConfig::with_data_dir("/tmp/hc")).unwrap();
    assert!(json.contains("\"dataDir\":\"/tmp/hc\""));
    assert!(json.contains("maxSearchResults"));
}

#[test]
fn test_load_missing_file_returns_defaults() {
    let config = load_config(std::path::Path::new("/nonexistent/hotclip/config.json"));
    assert_eq!(config, StoreConfig::default());
}

#[test]
fn test_load_config_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{"dataDir": "/var/lib/hotclip", "maxSearchResults": 20}"#).unwrap();

    let config = load_config(&path);
    assert_eq!(config.data_dir, "/var/lib/hotclip");
    assert_eq!(config.max_search_results, 20);
}

#[test]
fn test_load_malformed_file_returns_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, "{ not json").unwrap();

    assert_eq!(load_config(&path), StoreConfig::default());
}

#[test]
fn test_default_config_path() {
    assert!(default_config_path().ends_with(".hotclip/config.json"));
}
