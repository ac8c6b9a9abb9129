//! In-memory car directory.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::core::{CarDirectory, CarRecord, StoreError};
use crate::util::serde::CarId;

/// Directory backed by a map, for development, tests and fleets loaded from a
/// JSON export.
#[derive(Default)]
pub struct InMemoryCarDirectory {
    cars: RwLock<HashMap<CarId, CarRecord>>,
}

impl InMemoryCarDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a directory from records; later duplicates win.
    pub fn from_records(records: impl IntoIterator<Item = CarRecord>) -> Self {
        let cars = records
            .into_iter()
            .map(|r| (r.car_id.clone(), r))
            .collect();
        Self {
            cars: RwLock::new(cars),
        }
    }

    /// Parse a JSON array of [`CarRecord`]s.
    pub fn from_json_str(input: &str) -> Result<Self, StoreError> {
        let records: Vec<CarRecord> = serde_json::from_str(input)
            .map_err(|e| StoreError::Backend(format!("parse error: {e}")))?;
        Ok(Self::from_records(records))
    }

    /// Insert or replace a car.
    pub fn upsert(&self, record: CarRecord) {
        self.cars.write().insert(record.car_id.clone(), record);
    }

    /// Remove a car, returning its last record.
    pub fn remove(&self, car_id: &str) -> Option<CarRecord> {
        self.cars.write().remove(car_id)
    }

    /// Suspend or reactivate a car. Returns `false` if it is unknown.
    pub fn set_active(&self, car_id: &str, is_active: bool) -> bool {
        self.cars
            .write()
            .get_mut(car_id)
            .map(|record| record.is_active = is_active)
            .is_some()
    }

    /// Number of known cars.
    pub fn len(&self) -> usize {
        self.cars.read().len()
    }

    /// Whether the directory is empty.
    pub fn is_empty(&self) -> bool {
        self.cars.read().is_empty()
    }
}

#[async_trait]
impl CarDirectory for InMemoryCarDirectory {
    async fn lookup_car(&self, car_id: &str) -> Result<Option<CarRecord>, StoreError> {
        Ok(self.cars.read().get(car_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::serde::CapacityClass;

    #[tokio::test]
    async fn test_lookup_known_and_unknown() {
        let dir = InMemoryCarDirectory::from_records([CarRecord::active("car-1", CapacityClass(4))]);
        let found = dir.lookup_car("car-1").await.unwrap().unwrap();
        assert_eq!(found.capacity_class, CapacityClass(4));
        assert!(found.is_active);
        assert!(dir.lookup_car("car-2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_active() {
        let dir = InMemoryCarDirectory::new();
        dir.upsert(CarRecord::active("car-1", CapacityClass(6)));

        assert!(dir.set_active("car-1", false));
        assert!(!dir.lookup_car("car-1").await.unwrap().unwrap().is_active);
        assert!(!dir.set_active("ghost", false));
    }

    #[test]
    fn test_from_json_defaults_active() {
        let dir = InMemoryCarDirectory::from_json_str(
            r#"[
                {"car_id": "a", "capacity_class": 4},
                {"car_id": "b", "capacity_class": 7, "is_active": false}
            ]"#,
        )
        .unwrap();
        assert_eq!(dir.len(), 2);
        assert!(dir.cars.read()["a"].is_active);
        assert!(!dir.cars.read()["b"].is_active);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            InMemoryCarDirectory::from_json_str("{not json"),
            Err(StoreError::Backend(_))
        ));
    }
}
