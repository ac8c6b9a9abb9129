//! Tests for configuration validation

use std::path::PathBuf;

use taxi_dispatch::config::{parse_classes, DispatchConfig, QueueBackendConfig};

#[test]
fn test_dispatch_config_validation() {
    let valid = DispatchConfig {
        capacity_classes: vec![4, 6, 8],
        max_insert_attempts: 5,
        store_timeout_ms: 1_000,
        ..DispatchConfig::default()
    };
    assert!(valid.validate().is_ok());
}

#[test]
fn test_dispatch_config_invalid_classes() {
    let empty = DispatchConfig {
        capacity_classes: vec![],
        ..DispatchConfig::default()
    };
    assert!(empty.validate().is_err());

    let zero = DispatchConfig {
        capacity_classes: vec![0, 4],
        ..DispatchConfig::default()
    };
    assert!(zero.validate().is_err());

    let duplicate = DispatchConfig {
        capacity_classes: vec![4, 4],
        ..DispatchConfig::default()
    };
    assert!(duplicate.validate().is_err());
}

#[test]
fn test_dispatch_config_invalid_attempts_and_timeout() {
    let attempts = DispatchConfig {
        max_insert_attempts: 0,
        ..DispatchConfig::default()
    };
    assert!(attempts.validate().is_err());

    let timeout = DispatchConfig {
        store_timeout_ms: 0,
        ..DispatchConfig::default()
    };
    assert!(timeout.validate().is_err());
}

#[test]
fn test_file_backend_requires_data_dir() {
    let missing = DispatchConfig {
        queue: QueueBackendConfig::File,
        ..DispatchConfig::default()
    };
    assert!(missing.validate().is_err());

    let present = DispatchConfig {
        queue: QueueBackendConfig::File,
        data_dir: Some(PathBuf::from("/var/lib/dispatch")),
        ..DispatchConfig::default()
    };
    assert!(present.validate().is_ok());
}

#[test]
fn test_from_json_str_fills_defaults() {
    let cfg = DispatchConfig::from_json_str(
        r#"{"capacity_classes": [4, 7], "queue": "file", "data_dir": "/tmp/q"}"#,
    )
    .unwrap();
    assert_eq!(cfg.capacity_classes, vec![4, 7]);
    assert_eq!(cfg.queue, QueueBackendConfig::File);
    assert_eq!(cfg.max_insert_attempts, 3);
    assert_eq!(cfg.store_timeout_ms, 5_000);
    assert!(cfg.directory.active_flag);
}

#[test]
fn test_from_json_str_rejects_invalid() {
    assert!(DispatchConfig::from_json_str(r#"{"capacity_classes": []}"#).is_err());
    assert!(DispatchConfig::from_json_str("not json").is_err());
}

#[test]
fn test_parse_classes() {
    assert_eq!(parse_classes("4,5,6,7,8").unwrap(), vec![4, 5, 6, 7, 8]);
    assert!(parse_classes("4,six").is_err());
}

#[test]
fn test_from_env_overrides() {
    std::env::set_var("DISPATCH_CAPACITY_CLASSES", "4,6");
    std::env::set_var("DISPATCH_MAX_INSERT_ATTEMPTS", "5");
    std::env::set_var("DISPATCH_STORE_TIMEOUT_MS", "750");
    std::env::set_var("DISPATCH_DATA_DIR", "/tmp/dispatch-queues");

    let cfg = DispatchConfig::from_env();

    for key in [
        "DISPATCH_CAPACITY_CLASSES",
        "DISPATCH_MAX_INSERT_ATTEMPTS",
        "DISPATCH_STORE_TIMEOUT_MS",
        "DISPATCH_DATA_DIR",
    ] {
        std::env::remove_var(key);
    }

    let cfg = cfg.unwrap();
    assert_eq!(cfg.capacity_classes, vec![4, 6]);
    assert_eq!(cfg.max_insert_attempts, 5);
    assert_eq!(cfg.store_timeout().as_millis(), 750);
    assert_eq!(cfg.queue, QueueBackendConfig::File);
    assert_eq!(cfg.data_dir, Some(PathBuf::from("/tmp/dispatch-queues")));
}
