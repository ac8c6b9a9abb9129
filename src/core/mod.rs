//! Dispatch core: per-class FIFO queues, position maintenance and allocation.

pub mod allocator;
pub mod audit;
pub mod classes;
pub mod directory;
pub mod dispatcher;
pub mod engine;
pub mod error;
pub mod queue;
pub mod repair;

pub use allocator::PositionAllocator;
pub use audit::{build_audit_event, AuditAction, AuditEvent, AuditSink, InMemoryAuditSink};
pub use classes::ClassQueues;
pub use directory::{CarDirectory, CarRecord};
pub use dispatcher::Dispatcher;
pub use engine::{AllocationEngine, Assignment};
pub use error::{AppResult, DispatchError, ErrorCategory, StoreError};
pub use queue::{fifo_head, CapacityQueue, QueueEntry, Reposition};
pub use repair::PositionRepairer;
