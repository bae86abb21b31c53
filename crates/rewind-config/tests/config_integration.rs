use rewind_config::{AppConfig, DATA_DIR_ENV};

#[test]
fn test_load_creates_default_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rewind.json");
    assert!(!path.exists());

    let config = AppConfig::load_or_create(&path);
    assert!(path.exists());
    assert_eq!(config, AppConfig::default());

    // File should contain valid JSON
    let contents = std::fs::read_to_string(&path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert!(parsed.is_object());
    assert_eq!(parsed["merge_window_ms"], 300);
}

#[test]
fn test_load_existing_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rewind.json");
    let json = r#"{
        "merge_window_ms": 1000,
        "max_size": null,
        "initial_value": "draft",
        "data_dir": "/var/lib/rewind"
    }"#;
    std::fs::write(&path, json).unwrap();

    let config = AppConfig::load_or_create(&path);
    assert_eq!(config.merge_window_ms, 1000);
    assert_eq!(config.max_size, None);
    assert_eq!(config.initial_value, "draft");
    assert_eq!(config.data_dir, "/var/lib/rewind");
}

#[test]
fn test_broken_json_returns_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rewind.json");
    std::fs::write(&path, "{ this is not valid json }}}").unwrap();

    let config = AppConfig::load_or_create(&path);
    assert_eq!(config, AppConfig::default());

    // Broken file is left untouched
    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents, "{ this is not valid json }}}");
}

#[test]
fn test_partial_config_fills_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rewind.json");
    std::fs::write(&path, r#"{"max_size": 5}"#).unwrap();

    let config = AppConfig::load_or_create(&path);
    assert_eq!(config.max_size, Some(5));
    assert_eq!(config.merge_window_ms, 300);
    assert!(config.initial_value.is_empty());
}

#[test]
fn test_load_sanitizes_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rewind.json");
    std::fs::write(&path, r#"{"max_size": 0, "merge_window_ms": 99999999}"#).unwrap();

    let config = AppConfig::load_or_create(&path);
    assert_eq!(config.max_size, Some(1));
    assert_eq!(config.merge_window_ms, 60_000);
}

#[test]
fn test_save_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rewind.json");

    let config = AppConfig {
        merge_window_ms: 120,
        max_size: Some(42),
        initial_value: "line one\nline two \"quoted\"".to_string(),
        data_dir: String::new(),
    };
    config.save(&path).unwrap();

    let loaded = AppConfig::load_or_create(&path);
    assert_eq!(loaded, config);
}

#[test]
fn test_env_var_overrides_data_dir() {
    // Save and restore env var
    let original = std::env::var(DATA_DIR_ENV).ok();
    std::env::set_var(DATA_DIR_ENV, "/from/env");

    let config = AppConfig {
        data_dir: "/from/config".to_string(),
        ..Default::default()
    };
    assert_eq!(
        config.resolve_data_dir(),
        std::path::PathBuf::from("/from/env")
    );

    match original {
        Some(val) => std::env::set_var(DATA_DIR_ENV, val),
        None => std::env::remove_var(DATA_DIR_ENV),
    }
}
