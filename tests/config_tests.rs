// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for configuration module

use posegrid::{Config, ConfigError, SourceKind};

#[test]
fn test_config_default() {
    let config = Config::default();

    assert!(!config.ask_world_frame, "Defaults should skip the dialog");
    assert_eq!(config.poll_interval_ms, 100);
    assert_eq!(config.source, SourceKind::Orbit);
    assert_eq!(config.world.canvas_size(), (500, 400));
}

#[test]
fn test_config_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("posegrid").join("config.json");

    let mut config = Config::default();
    config.world.length_m = 6.0;
    config.poll_interval_ms = 1000;
    config.poll_imu = false;
    config.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let loaded = Config::load_from(&dir.path().join("absent.json")).unwrap();
    assert_eq!(loaded, Config::default());
}

#[test]
fn test_invalid_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(matches!(
        Config::load_from(&path),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_invalid_world_frame_is_rejected_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{"world": {"length_m": -1.0, "width_m": 8.0, "pixels_per_grid_line": 25, "grid_spacing_m": 0.5}}"#,
    )
    .unwrap();

    assert!(matches!(
        Config::load_from(&path),
        Err(ConfigError::InvalidDimension { name: "length_m", .. })
    ));
}

#[test]
fn test_snapshot_dir_override() {
    let config = Config {
        snapshot_dir: Some("/tmp/posegrid-snapshots".into()),
        ..Default::default()
    };
    assert_eq!(
        config.snapshot_dir(),
        std::path::PathBuf::from("/tmp/posegrid-snapshots")
    );
}

#[test]
fn test_oversized_world_frame_is_rejected_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    let mut config = Config::default();
    config.world.length_m = 1.0e9;
    std::fs::write(&path, serde_json::to_string(&config).unwrap()).unwrap();

    assert!(matches!(
        Config::load_from(&path),
        Err(ConfigError::CanvasTooLarge { .. })
    ));
}
