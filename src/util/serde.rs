//! Serializable identifiers and value types shared across the dispatch core.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a car as known to the fleet directory.
pub type CarId = String;

/// Unique identifier of a queue entry.
pub type QueueId = uuid::Uuid;

/// 1-indexed FIFO rank of an entry within its capacity class.
pub type Position = u32;

/// Vehicle category defined by its maximum passenger count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapacityClass(pub u32);

impl CapacityClass {
    /// Maximum number of passengers this class seats.
    pub const fn seats(self) -> u32 {
        self.0
    }

    /// Whether a vehicle of this class can carry `passengers`.
    pub const fn fits(self, passengers: u32) -> bool {
        passengers <= self.0
    }
}

impl From<u32> for CapacityClass {
    fn from(seats: u32) -> Self {
        Self(seats)
    }
}

impl fmt::Display for CapacityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-seater", self.0)
    }
}
