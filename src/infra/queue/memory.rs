//! In-memory capacity queue with position and car uniqueness.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::core::{CapacityQueue, QueueEntry, Reposition, StoreError};
use crate::util::serde::{CapacityClass, Position, QueueId};

/// Entries of one class keyed by position.
///
/// Shared by the in-memory and file-backed stores; each method is one atomic
/// step against the table.
#[derive(Debug, Clone)]
pub(crate) struct PositionTable {
    class: CapacityClass,
    entries: BTreeMap<Position, QueueEntry>,
}

impl PositionTable {
    pub(crate) const fn new(class: CapacityClass) -> Self {
        Self {
            class,
            entries: BTreeMap::new(),
        }
    }

    /// Rebuild from persisted entries, enforcing the same constraints as
    /// [`Self::insert`].
    pub(crate) fn from_entries(
        class: CapacityClass,
        entries: impl IntoIterator<Item = QueueEntry>,
    ) -> Result<Self, StoreError> {
        let mut table = Self::new(class);
        for entry in entries {
            if entry.capacity_class != class {
                return Err(StoreError::Backend(format!(
                    "entry {} belongs to class {}, not {class}",
                    entry.queue_id, entry.capacity_class
                )));
            }
            table.check_free(&entry.car_id, entry.position)?;
            table.entries.insert(entry.position, entry);
        }
        Ok(table)
    }

    fn check_free(&self, car_id: &str, position: Position) -> Result<(), StoreError> {
        if self.entries.contains_key(&position) {
            return Err(StoreError::Collision {
                class: self.class,
                position,
            });
        }
        if self.entries.values().any(|e| e.car_id == car_id) {
            return Err(StoreError::DuplicateCar(car_id.to_owned()));
        }
        Ok(())
    }

    pub(crate) fn insert(&mut self, car_id: &str, position: Position) -> Result<QueueEntry, StoreError> {
        if position == 0 {
            return Err(StoreError::Backend("positions start at 1".into()));
        }
        self.check_free(car_id, position)?;
        let entry = QueueEntry::new(car_id, self.class, position);
        self.entries.insert(position, entry.clone());
        Ok(entry)
    }

    fn position_of(&self, queue_id: QueueId) -> Option<Position> {
        self.entries
            .iter()
            .find(|(_, e)| e.queue_id == queue_id)
            .map(|(p, _)| *p)
    }

    pub(crate) fn remove(&mut self, queue_id: QueueId) -> bool {
        self.position_of(queue_id)
            .and_then(|p| self.entries.remove(&p))
            .is_some()
    }

    pub(crate) fn snapshot(&self) -> Vec<QueueEntry> {
        self.entries.values().cloned().collect()
    }

    pub(crate) fn tail(&self) -> Option<Position> {
        self.entries.keys().next_back().copied()
    }

    pub(crate) fn get(&self, queue_id: QueueId) -> Option<QueueEntry> {
        self.entries.values().find(|e| e.queue_id == queue_id).cloned()
    }

    pub(crate) fn find_car(&self, car_id: &str) -> Option<QueueEntry> {
        self.entries.values().find(|e| e.car_id == car_id).cloned()
    }

    pub(crate) fn reposition(
        &mut self,
        queue_id: QueueId,
        position: Position,
    ) -> Result<Reposition, StoreError> {
        let Some(current) = self.position_of(queue_id) else {
            return Ok(Reposition::Missing);
        };
        if current == position {
            return Ok(Reposition::Unchanged);
        }
        if position == 0 || self.entries.contains_key(&position) {
            return Err(StoreError::Collision {
                class: self.class,
                position,
            });
        }
        if let Some(mut entry) = self.entries.remove(&current) {
            entry.position = position;
            self.entries.insert(position, entry);
        }
        Ok(Reposition::Moved)
    }

    pub(crate) fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        removed
    }
}

/// In-memory queue for one capacity class.
///
/// Each call takes the lock once, so a read followed by a write is not atomic;
/// callers rely on the uniqueness checks in [`CapacityQueue::insert`] and
/// [`CapacityQueue::reposition`] exactly as they would against a database.
pub struct InMemoryCapacityQueue {
    class: CapacityClass,
    table: Mutex<PositionTable>,
}

impl InMemoryCapacityQueue {
    /// Create an empty queue for `class`.
    pub fn new(class: CapacityClass) -> Self {
        Self {
            class,
            table: Mutex::new(PositionTable::new(class)),
        }
    }

    /// Current number of entries.
    pub fn len(&self) -> usize {
        self.table.lock().entries.len()
    }

    /// Whether the queue holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CapacityQueue for InMemoryCapacityQueue {
    fn capacity_class(&self) -> CapacityClass {
        self.class
    }

    async fn insert(&self, car_id: &str, position: Position) -> Result<QueueEntry, StoreError> {
        self.table.lock().insert(car_id, position)
    }

    async fn remove_by_queue_id(&self, queue_id: QueueId) -> Result<bool, StoreError> {
        Ok(self.table.lock().remove(queue_id))
    }

    async fn snapshot(&self) -> Result<Vec<QueueEntry>, StoreError> {
        Ok(self.table.lock().snapshot())
    }

    async fn tail_position(&self) -> Result<Option<Position>, StoreError> {
        Ok(self.table.lock().tail())
    }

    async fn get(&self, queue_id: QueueId) -> Result<Option<QueueEntry>, StoreError> {
        Ok(self.table.lock().get(queue_id))
    }

    async fn find_car(&self, car_id: &str) -> Result<Option<QueueEntry>, StoreError> {
        Ok(self.table.lock().find_car(car_id))
    }

    async fn reposition(
        &self,
        queue_id: QueueId,
        position: Position,
    ) -> Result<Reposition, StoreError> {
        self.table.lock().reposition(queue_id, position)
    }

    async fn clear(&self) -> Result<usize, StoreError> {
        Ok(self.table.lock().clear())
    }
}
