//! Gap closing for a class's position sequence.

use std::time::Duration;

use crate::core::{CapacityQueue, DispatchError, QueueEntry, Reposition};
use crate::util::timeout::round_trip;

/// Renumbers a queue to `1..=N` without changing relative FIFO order.
///
/// Idempotent: a second run with no intervening writes adjusts nothing.
#[derive(Debug, Clone)]
pub struct PositionRepairer {
    timeout: Duration,
}

impl PositionRepairer {
    /// Create a repairer applying `timeout` to each store round-trip.
    pub const fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Close position gaps in `queue`, returning how many entries moved.
    pub async fn repair(&self, queue: &dyn CapacityQueue) -> Result<usize, DispatchError> {
        let class = queue.capacity_class();
        let mut entries = round_trip(self.timeout, "snapshot", queue.snapshot()).await?;
        entries.sort_by_key(QueueEntry::fifo_key);

        let mut adjusted = 0;
        for (rank, entry) in (1..).zip(&entries) {
            if entry.position == rank {
                continue;
            }
            let outcome = round_trip(
                self.timeout,
                "reposition",
                queue.reposition(entry.queue_id, rank),
            )
            .await?;
            match outcome {
                Reposition::Moved => {
                    tracing::debug!(%class, car_id = %entry.car_id, from = entry.position, to = rank, "position repaired");
                    adjusted += 1;
                }
                // Another repair got there first.
                Reposition::Unchanged => {}
                Reposition::Missing => {
                    tracing::debug!(%class, car_id = %entry.car_id, "entry vanished during repair");
                }
            }
        }

        if adjusted > 0 {
            tracing::info!(%class, adjusted, "queue positions repaired");
        }
        Ok(adjusted)
    }
}

impl Default for PositionRepairer {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}
