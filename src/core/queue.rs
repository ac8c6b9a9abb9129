//! Per-class FIFO queue abstraction.
//!
//! A [`CapacityQueue`] holds the waiting vehicles of exactly one capacity
//! class. Implementations talk to a shared store and must enforce two
//! uniqueness constraints atomically: one entry per `(class, position)` and one
//! entry per car. Everything else (position choice, gap repair, allocation) is
//! composed on top by the dispatch components.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::StoreError;
use crate::util::clock::now_ms;
use crate::util::serde::{CapacityClass, CarId, Position, QueueId};

/// A vehicle waiting in a capacity-class queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    /// Unique entry identifier.
    pub queue_id: QueueId,
    /// Queued car.
    pub car_id: CarId,
    /// Class queue the entry lives in.
    pub capacity_class: CapacityClass,
    /// 1-indexed FIFO position.
    pub position: Position,
    /// Enqueue timestamp in milliseconds since epoch.
    pub enqueued_at_ms: u64,
}

impl QueueEntry {
    /// Create a fresh entry stamped with the current time.
    pub fn new(car_id: impl Into<CarId>, capacity_class: CapacityClass, position: Position) -> Self {
        Self {
            queue_id: QueueId::new_v4(),
            car_id: car_id.into(),
            capacity_class,
            position,
            enqueued_at_ms: now_ms(),
        }
    }

    /// FIFO ordering key: position, then enqueue time.
    pub const fn fifo_key(&self) -> (Position, u64) {
        (self.position, self.enqueued_at_ms)
    }
}

/// What a [`CapacityQueue::reposition`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reposition {
    /// The entry was moved to the requested position.
    Moved,
    /// The entry already held the requested position; nothing changed.
    Unchanged,
    /// The entry no longer exists.
    Missing,
}

/// Ordered store of one capacity class's waiting vehicles.
///
/// Every method is one round-trip against the store. Reads are point-in-time
/// views and may go stale as soon as they return.
#[async_trait]
pub trait CapacityQueue: Send + Sync {
    /// Class served by this queue.
    fn capacity_class(&self) -> CapacityClass;

    /// Create an entry for `car_id` at exactly `position`.
    ///
    /// Fails with [`StoreError::Collision`] if the slot is taken and with
    /// [`StoreError::DuplicateCar`] if the car is already queued here.
    async fn insert(&self, car_id: &str, position: Position) -> Result<QueueEntry, StoreError>;

    /// Delete an entry. Returns `false` when nothing was removed (lost race).
    /// The gap this leaves is not repaired here.
    async fn remove_by_queue_id(&self, queue_id: QueueId) -> Result<bool, StoreError>;

    /// All entries in ascending FIFO order.
    async fn snapshot(&self) -> Result<Vec<QueueEntry>, StoreError>;

    /// Highest occupied position, or `None` when the queue is empty.
    async fn tail_position(&self) -> Result<Option<Position>, StoreError>;

    /// Fetch a single entry by id.
    async fn get(&self, queue_id: QueueId) -> Result<Option<QueueEntry>, StoreError>;

    /// Fetch the live entry of a car, if any.
    async fn find_car(&self, car_id: &str) -> Result<Option<QueueEntry>, StoreError>;

    /// Move an entry to `position`. Fails with [`StoreError::Collision`] if
    /// another entry holds the target slot.
    async fn reposition(
        &self,
        queue_id: QueueId,
        position: Position,
    ) -> Result<Reposition, StoreError>;

    /// Remove every entry, returning how many were dropped.
    async fn clear(&self) -> Result<usize, StoreError>;
}

/// Entry that would be served first, using enqueue time to break position ties.
pub fn fifo_head(entries: &[QueueEntry]) -> Option<&QueueEntry> {
    entries.iter().min_by_key(|e| e.fifo_key())
}
