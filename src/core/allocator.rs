//! FIFO position assignment for newly admitted cars.
//!
//! Positions are protected by the store's `(class, position)` uniqueness
//! constraint rather than a lock. The allocator reads the tail, tries the next
//! slot, and walks forward on [`StoreError::Collision`] a bounded number of
//! times. Running out of attempts is reported as
//! [`DispatchError::Congestion`] so the caller can retry from scratch.

use std::time::Duration;

use crate::core::{CapacityQueue, DispatchError, QueueEntry, StoreError};
use crate::util::timeout::round_trip;

/// Bounded-optimistic position allocator.
#[derive(Debug, Clone)]
pub struct PositionAllocator {
    max_attempts: u32,
    timeout: Duration,
}

impl PositionAllocator {
    /// Insert attempts made before reporting congestion.
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

    /// Create an allocator; `max_attempts` is clamped to at least one.
    pub fn new(max_attempts: u32, timeout: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            timeout,
        }
    }

    /// Configured attempt bound.
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Insert `car_id` at the next free position of `queue`.
    pub async fn admit(
        &self,
        queue: &dyn CapacityQueue,
        car_id: &str,
    ) -> Result<QueueEntry, DispatchError> {
        let class = queue.capacity_class();
        let tail = round_trip(self.timeout, "tail_position", queue.tail_position()).await?;
        let mut candidate = tail.map_or(1, |p| p + 1);

        for attempt in 1..=self.max_attempts {
            match round_trip(self.timeout, "insert", queue.insert(car_id, candidate)).await {
                Ok(entry) => {
                    tracing::debug!(%class, car_id, position = entry.position, attempt, "position allocated");
                    return Ok(entry);
                }
                Err(StoreError::Collision { position, .. }) => {
                    tracing::debug!(%class, car_id, position, attempt, "position collision");
                    candidate = position + 1;
                }
                Err(err) => return Err(err.into()),
            }
        }

        tracing::warn!(%class, car_id, attempts = self.max_attempts, "position allocation congested");
        Err(DispatchError::Congestion {
            class,
            attempts: self.max_attempts,
        })
    }
}

impl Default for PositionAllocator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ATTEMPTS, Duration::from_secs(5))
    }
}
