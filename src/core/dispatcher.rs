//! Dispatch facade: the operations exposed to the surrounding application.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use taxi_dispatch::builders::{build_dispatcher, configured_queue};
//! use taxi_dispatch::config::DispatchConfig;
//! use taxi_dispatch::infra::InMemoryCarDirectory;
//!
//! let directory = Arc::new(InMemoryCarDirectory::new());
//! let dispatcher = build_dispatcher(&DispatchConfig::default(), configured_queue, directory)?;
//!
//! dispatcher.enqueue("car-17").await?;
//! let assignment = dispatcher.assign(3).await?;
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use crate::config::DirectoryCapabilities;
use crate::core::{
    build_audit_event, AllocationEngine, Assignment, AuditAction, AuditSink, CarDirectory,
    ClassQueues, DispatchError, PositionAllocator, PositionRepairer, QueueEntry,
};
use crate::util::serde::{CapacityClass, Position};
use crate::util::timeout::round_trip;

/// Entry point for admissions, bookings and queue administration.
///
/// Holds no global state: queues, directory and policy are injected, so any
/// of them can be replaced with a test double.
pub struct Dispatcher {
    queues: Arc<ClassQueues>,
    directory: Arc<dyn CarDirectory>,
    capabilities: DirectoryCapabilities,
    allocator: PositionAllocator,
    repairer: PositionRepairer,
    engine: AllocationEngine,
    timeout: Duration,
    audit: Option<Arc<dyn AuditSink>>,
}

impl Dispatcher {
    /// Wire a dispatcher from its collaborators.
    pub fn new(
        queues: ClassQueues,
        directory: Arc<dyn CarDirectory>,
        capabilities: DirectoryCapabilities,
        allocator: PositionAllocator,
        timeout: Duration,
    ) -> Self {
        let queues = Arc::new(queues);
        let repairer = PositionRepairer::new(timeout);
        let engine = AllocationEngine::new(Arc::clone(&queues), repairer.clone(), timeout);
        Self {
            queues,
            directory,
            capabilities,
            allocator,
            repairer,
            engine,
            timeout,
            audit: None,
        }
    }

    /// Attach an audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Supported classes, ascending.
    pub fn capacity_classes(&self) -> Vec<CapacityClass> {
        self.queues.classes().collect()
    }

    /// Admit a car to the queue of its capacity class.
    pub async fn enqueue(&self, car_id: &str) -> Result<QueueEntry, DispatchError> {
        let result = self.try_enqueue(car_id).await;
        match &result {
            Ok(entry) => {
                tracing::info!(car_id, class = %entry.capacity_class, position = entry.position, "car enqueued");
                self.record(
                    AuditAction::Enqueue,
                    Some(car_id),
                    Some(entry.capacity_class),
                    Some(entry.position),
                    None,
                );
            }
            Err(err) => {
                tracing::info!(car_id, error = %err, "enqueue rejected");
                self.record(AuditAction::Reject, Some(car_id), None, None, Some(err.to_string()));
            }
        }
        result
    }

    async fn try_enqueue(&self, car_id: &str) -> Result<QueueEntry, DispatchError> {
        let record = round_trip(self.timeout, "lookup_car", self.directory.lookup_car(car_id))
            .await?
            .ok_or_else(|| DispatchError::NotFound(car_id.to_owned()))?;

        if self.capabilities.active_flag && !record.is_active {
            return Err(DispatchError::Suspended(car_id.to_owned()));
        }

        let queue = self.queues.get(record.capacity_class)?;

        for (_, other) in self.queues.iter() {
            if round_trip(self.timeout, "find_car", other.find_car(car_id))
                .await?
                .is_some()
            {
                return Err(DispatchError::AlreadyQueued(car_id.to_owned()));
            }
        }

        self.allocator.admit(queue.as_ref(), car_id).await
    }

    /// Dispatch the best-fitting vehicle for `passengers`.
    pub async fn assign(&self, passengers: u32) -> Result<Assignment, DispatchError> {
        let assignment = self.engine.assign(passengers).await?;
        self.record(
            AuditAction::Assign,
            Some(&assignment.car_id),
            Some(assignment.capacity_class),
            Some(assignment.original_position),
            Some(format!("passengers={passengers}")),
        );
        Ok(assignment)
    }

    /// Ordered view of one class's queue.
    pub async fn queue_snapshot(
        &self,
        class: CapacityClass,
    ) -> Result<Vec<QueueEntry>, DispatchError> {
        let queue = self.queues.get(class)?;
        let mut entries = round_trip(self.timeout, "snapshot", queue.snapshot()).await?;
        entries.sort_by_key(QueueEntry::fifo_key);
        Ok(entries)
    }

    /// Drop every entry of one class, bypassing FIFO.
    pub async fn clear_queue(&self, class: CapacityClass) -> Result<usize, DispatchError> {
        let queue = self.queues.get(class)?;
        let removed = round_trip(self.timeout, "clear", queue.clear()).await?;
        tracing::info!(%class, removed, "queue cleared");
        self.record(
            AuditAction::Clear,
            None,
            Some(class),
            None,
            Some(format!("removed={removed}")),
        );
        Ok(removed)
    }

    /// Remove a single car from whichever class queue holds it.
    ///
    /// Returns `false` when the car was not queued. The gap is left for
    /// [`Self::repair_positions`].
    pub async fn remove_car(&self, car_id: &str) -> Result<bool, DispatchError> {
        for (class, queue) in self.queues.iter() {
            let Some(entry) = round_trip(self.timeout, "find_car", queue.find_car(car_id)).await?
            else {
                continue;
            };
            let removed = round_trip(
                self.timeout,
                "remove_by_queue_id",
                queue.remove_by_queue_id(entry.queue_id),
            )
            .await?;
            if removed {
                tracing::info!(%class, car_id, position = entry.position, "car removed");
                self.record(
                    AuditAction::Remove,
                    Some(car_id),
                    Some(class),
                    Some(entry.position),
                    None,
                );
            }
            return Ok(removed);
        }
        Ok(false)
    }

    /// Close position gaps in one class, or in every class when `class` is
    /// `None`. Returns the number of entries moved.
    pub async fn repair_positions(
        &self,
        class: Option<CapacityClass>,
    ) -> Result<usize, DispatchError> {
        let targets: Vec<CapacityClass> = match class {
            Some(class) => vec![class],
            None => self.queues.classes().collect(),
        };

        let mut adjusted = 0;
        for class in targets {
            let queue = self.queues.get(class)?;
            let moved = self.repairer.repair(queue.as_ref()).await?;
            if moved > 0 {
                self.record(
                    AuditAction::Repair,
                    None,
                    Some(class),
                    None,
                    Some(format!("adjusted={moved}")),
                );
            }
            adjusted += moved;
        }
        Ok(adjusted)
    }

    /// Number of waiting vehicles per class.
    pub async fn queue_depths(&self) -> Result<BTreeMap<CapacityClass, usize>, DispatchError> {
        let mut depths = BTreeMap::new();
        for (class, queue) in self.queues.iter() {
            let entries = round_trip(self.timeout, "snapshot", queue.snapshot()).await?;
            depths.insert(class, entries.len());
        }
        Ok(depths)
    }

    fn record(
        &self,
        action: AuditAction,
        car_id: Option<&str>,
        class: Option<CapacityClass>,
        position: Option<Position>,
        detail: Option<String>,
    ) {
        if let Some(sink) = &self.audit {
            sink.record(build_audit_event(action, car_id, class, position, detail));
        }
    }
}
