//! Tests for the in-memory car directory

use std::sync::Arc;

use taxi_dispatch::core::{CarDirectory, CarRecord};
use taxi_dispatch::infra::InMemoryCarDirectory;
use taxi_dispatch::util::CapacityClass;

#[tokio::test]
async fn test_lookup_through_trait_object() {
    let directory: Arc<dyn CarDirectory> = Arc::new(InMemoryCarDirectory::from_records([
        CarRecord::active("car1", CapacityClass(4)),
        CarRecord::suspended("car2", CapacityClass(6)),
    ]));

    let car1 = directory.lookup_car("car1").await.unwrap().unwrap();
    assert_eq!(car1.capacity_class, CapacityClass(4));
    assert!(!directory.lookup_car("car2").await.unwrap().unwrap().is_active);
    assert!(directory.lookup_car("car3").await.unwrap().is_none());
}

#[tokio::test]
async fn test_upsert_replaces_and_remove_forgets() {
    let directory = InMemoryCarDirectory::new();
    directory.upsert(CarRecord::active("car1", CapacityClass(5)));
    directory.upsert(CarRecord::active("car1", CapacityClass(7)));

    assert_eq!(directory.len(), 1);
    let car1 = directory.lookup_car("car1").await.unwrap().unwrap();
    assert_eq!(car1.capacity_class, CapacityClass(7));

    assert_eq!(directory.remove("car1").map(|r| r.capacity_class), Some(CapacityClass(7)));
    assert!(directory.is_empty());
    assert!(directory.lookup_car("car1").await.unwrap().is_none());
}

#[test]
fn test_later_duplicates_win() {
    let directory = InMemoryCarDirectory::from_records([
        CarRecord::active("car1", CapacityClass(4)),
        CarRecord::suspended("car1", CapacityClass(4)),
    ]);
    assert_eq!(directory.len(), 1);
}
