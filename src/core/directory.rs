//! Fleet directory seam.
//!
//! The dispatch core only needs to know a car's capacity class and whether it
//! is active. The directory itself (fleet CRUD, hosted database) lives outside
//! this crate and is reached through [`CarDirectory`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::StoreError;
use crate::util::serde::{CapacityClass, CarId};

/// Directory view of a car.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarRecord {
    /// Car identifier.
    pub car_id: CarId,
    /// Capacity class the car belongs to.
    pub capacity_class: CapacityClass,
    /// Whether the car may be admitted to dispatch.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

const fn default_active() -> bool {
    true
}

impl CarRecord {
    /// Active car of the given class.
    pub fn active(car_id: impl Into<CarId>, capacity_class: CapacityClass) -> Self {
        Self {
            car_id: car_id.into(),
            capacity_class,
            is_active: true,
        }
    }

    /// Suspended car of the given class.
    pub fn suspended(car_id: impl Into<CarId>, capacity_class: CapacityClass) -> Self {
        Self {
            is_active: false,
            ..Self::active(car_id, capacity_class)
        }
    }
}

/// Resolves car identifiers to their class and status.
#[async_trait]
pub trait CarDirectory: Send + Sync {
    /// Look up a car; `Ok(None)` means it does not exist.
    async fn lookup_car(&self, car_id: &str) -> Result<Option<CarRecord>, StoreError>;
}
