//! Optimal-then-move-up allocation.
//!
//! A request for `n` passengers is served from the smallest class seating `n`
//! when that class has a waiting vehicle, otherwise from the next larger
//! non-empty class. Smaller classes are never considered. Within the chosen
//! class the FIFO head is removed, the removal is verified with a second read,
//! and the gap it leaves is repaired on a best-effort basis.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::queue::fifo_head;
use crate::core::{CapacityQueue, ClassQueues, DispatchError, PositionRepairer, QueueEntry};
use crate::util::serde::{CapacityClass, CarId, Position};
use crate::util::timeout::round_trip;

/// Result of a successful allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Dispatched car.
    pub car_id: CarId,
    /// Class the car was taken from.
    pub capacity_class: CapacityClass,
    /// Queue position the car held before removal.
    pub original_position: Position,
    /// Passenger count of the request.
    pub requested_passengers: u32,
    /// Smallest class that seats the request.
    pub optimal_class: CapacityClass,
}

impl Assignment {
    /// Whether a larger class than optimal had to be used.
    pub fn is_move_up(&self) -> bool {
        self.capacity_class > self.optimal_class
    }
}

/// Matches passenger requests to queued vehicles.
#[derive(Clone)]
pub struct AllocationEngine {
    queues: Arc<ClassQueues>,
    repairer: PositionRepairer,
    timeout: Duration,
}

impl AllocationEngine {
    /// Create an engine over `queues`, repairing with `repairer` after each
    /// removal and applying `timeout` to every store round-trip.
    pub const fn new(queues: Arc<ClassQueues>, repairer: PositionRepairer, timeout: Duration) -> Self {
        Self {
            queues,
            repairer,
            timeout,
        }
    }

    /// Dispatch the best-fitting queued vehicle for `passengers`.
    pub async fn assign(&self, passengers: u32) -> Result<Assignment, DispatchError> {
        let optimal_class = self.queues.optimal_class(passengers)?;

        for (class, queue) in self.queues.priority(optimal_class) {
            let entries = round_trip(self.timeout, "snapshot", queue.snapshot()).await?;
            let Some(head) = fifo_head(&entries).cloned() else {
                tracing::trace!(%class, "class empty, moving up");
                continue;
            };

            let removed = round_trip(
                self.timeout,
                "remove_by_queue_id",
                queue.remove_by_queue_id(head.queue_id),
            )
            .await?;
            if !removed {
                // Lost the race for this head. Re-scanning under contention is
                // left to the caller.
                tracing::warn!(%class, car_id = %head.car_id, passengers, "lost removal race");
                return Err(DispatchError::NoAvailableVehicle { passengers });
            }

            self.verify_removed(queue.as_ref(), &head).await?;

            if let Err(err) = self.repairer.repair(queue.as_ref()).await {
                tracing::warn!(%class, error = %err, "post-assignment repair failed");
            }

            tracing::info!(
                %class,
                %optimal_class,
                car_id = %head.car_id,
                position = head.position,
                passengers,
                "vehicle assigned"
            );
            return Ok(Assignment {
                car_id: head.car_id,
                capacity_class: class,
                original_position: head.position,
                requested_passengers: passengers,
                optimal_class,
            });
        }

        tracing::info!(%optimal_class, passengers, "no vehicle available");
        Err(DispatchError::NoAvailableVehicle { passengers })
    }

    async fn verify_removed(
        &self,
        queue: &dyn CapacityQueue,
        head: &QueueEntry,
    ) -> Result<(), DispatchError> {
        let lingering = round_trip(self.timeout, "get", queue.get(head.queue_id)).await?;
        if lingering.is_some() {
            tracing::error!(
                class = %head.capacity_class,
                car_id = %head.car_id,
                "entry still present after removal"
            );
            return Err(DispatchError::Store(format!(
                "entry {} for car {} still present after removal",
                head.queue_id, head.car_id
            )));
        }
        Ok(())
    }
}
