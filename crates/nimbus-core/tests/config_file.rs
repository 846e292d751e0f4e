//! Integration tests for loading and saving the TOML config file.

use nimbus_core::{Config, ConfigError};
use tempfile::tempdir;

#[test]
fn test_missing_file_writes_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nimbus").join("config.toml");

    let config = Config::load_from(&path).unwrap();

    assert!(path.exists(), "default config should be written on first load");
    assert_eq!(config.pull.threshold, 80.0);
    assert!(config.validate().is_valid());
}

#[test]
fn test_save_then_load_keeps_changes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");

    let mut config = Config::default();
    config.pull.trigger_ratio = 0.75;
    config.haptics.intensity = 0.5;
    config.screens.order = vec!["now".into(), "week".into()];
    config.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded.pull.trigger_ratio, 0.75);
    assert_eq!(loaded.haptics.intensity, 0.5);
    assert_eq!(loaded.screens.order, vec!["now", "week"]);
}

#[test]
fn test_malformed_file_is_parse_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[pull\nthreshold = ").unwrap();

    let err = Config::load_from(&path).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::ParseError(_))
    ));
}

#[test]
fn test_hand_written_file_with_sections() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[sampler]
deadzone_px = 4.0

[swipe]
min_distance = 70.0
max_duration_ms = 250

[haptics]
weather_cooldown_ms = 5000
"#,
    )
    .unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.sampler.deadzone_px, 4.0);
    assert!(config.sampler.touch_enabled);
    assert_eq!(config.swipe.min_distance, 70.0);
    assert_eq!(config.swipe.max_duration_ms, 250);
    assert_eq!(config.swipe.max_vertical, 100.0);
    assert_eq!(config.haptics.weather_cooldown_ms, 5000);
}
