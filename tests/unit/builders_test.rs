//! Tests for builder modules

use std::sync::Arc;

use taxi_dispatch::builders::{build_dispatcher, configured_queue};
use taxi_dispatch::config::{DispatchConfig, QueueBackendConfig};
use taxi_dispatch::core::{CapacityQueue, DispatchError, StoreError};
use taxi_dispatch::infra::{InMemoryCapacityQueue, InMemoryCarDirectory};
use taxi_dispatch::util::CapacityClass;

#[test]
fn test_builder_defaults() {
    let dispatcher = build_dispatcher(
        &DispatchConfig::default(),
        configured_queue,
        Arc::new(InMemoryCarDirectory::new()),
    )
    .unwrap();

    let classes: Vec<u32> = dispatcher.capacity_classes().iter().map(|c| c.seats()).collect();
    assert_eq!(classes, vec![4, 5, 6, 7, 8]);
}

#[test]
fn test_builder_custom_classes() {
    let cfg = DispatchConfig {
        capacity_classes: vec![8, 4],
        ..DispatchConfig::default()
    };
    let dispatcher =
        build_dispatcher(&cfg, configured_queue, Arc::new(InMemoryCarDirectory::new())).unwrap();
    assert_eq!(
        dispatcher.capacity_classes(),
        vec![CapacityClass(4), CapacityClass(8)]
    );
}

#[test]
fn test_builder_rejects_invalid_config() {
    let cfg = DispatchConfig {
        capacity_classes: vec![],
        ..DispatchConfig::default()
    };
    let result = build_dispatcher(&cfg, configured_queue, Arc::new(InMemoryCarDirectory::new()));
    assert!(matches!(result, Err(DispatchError::InvalidConfig(_))));
}

#[test]
fn test_builder_surfaces_factory_failure() {
    let result = build_dispatcher(
        &DispatchConfig::default(),
        |_, _| -> Result<Arc<dyn CapacityQueue>, StoreError> {
            Err(StoreError::Backend("store offline".into()))
        },
        Arc::new(InMemoryCarDirectory::new()),
    );
    assert!(matches!(result, Err(DispatchError::Store(msg)) if msg.contains("store offline")));
}

#[test]
fn test_builder_rejects_mismatched_factory() {
    let result = build_dispatcher(
        &DispatchConfig::default(),
        |_, _| -> Result<Arc<dyn CapacityQueue>, StoreError> {
            Ok(Arc::new(InMemoryCapacityQueue::new(CapacityClass(4))))
        },
        Arc::new(InMemoryCarDirectory::new()),
    );
    assert!(matches!(result, Err(DispatchError::InvalidConfig(_))));
}

#[test]
fn test_file_backend_creates_class_files() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = DispatchConfig {
        queue: QueueBackendConfig::File,
        data_dir: Some(dir.path().to_path_buf()),
        capacity_classes: vec![4, 6],
        ..DispatchConfig::default()
    };
    build_dispatcher(&cfg, configured_queue, Arc::new(InMemoryCarDirectory::new())).unwrap();

    assert!(dir.path().join("class-4.jsonl").exists());
    assert!(dir.path().join("class-6.jsonl").exists());
}
