//! Audit sink implementations.
//!
//! Every admission, rejection, dispatch and administrative action can be
//! recorded as an [`AuditEvent`]. Sinks are shared across concurrent callers.

use std::collections::VecDeque;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::util::clock::now_ms;
use crate::util::serde::{CapacityClass, CarId, Position};

/// Kind of action recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Car admitted to a class queue.
    Enqueue,
    /// Admission refused.
    Reject,
    /// Car dispatched to a passenger request.
    Assign,
    /// Single car removed administratively.
    Remove,
    /// Whole class queue cleared.
    Clear,
    /// Positions renumbered.
    Repair,
}

/// Audit event structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Event identifier.
    pub event_id: String,
    /// Action taken.
    pub action: AuditAction,
    /// Car involved, if any.
    pub car_id: Option<CarId>,
    /// Class involved, if any.
    pub capacity_class: Option<CapacityClass>,
    /// Queue position involved, if any.
    pub position: Option<Position>,
    /// Timestamp milliseconds.
    pub created_at_ms: u64,
    /// Additional context.
    pub detail: Option<String>,
}

/// Audit sink abstraction.
pub trait AuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: AuditEvent);
}

/// In-memory audit sink for testing and dev.
pub struct InMemoryAuditSink {
    events: Mutex<VecDeque<AuditEvent>>,
    max_events: usize,
}

impl InMemoryAuditSink {
    /// Create a new in-memory sink with a bounded buffer.
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Mutex::new(VecDeque::with_capacity(max_events.min(1024))),
            max_events: max_events.max(1),
        }
    }

    /// Retrieve a snapshot of stored events.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().iter().cloned().collect()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&self, event: AuditEvent) {
        let mut events = self.events.lock();
        if events.len() >= self.max_events {
            events.pop_front();
        }
        events.push_back(event);
    }
}

/// Helper to build an audit event stamped with a fresh id and the current time.
pub fn build_audit_event(
    action: AuditAction,
    car_id: Option<&str>,
    capacity_class: Option<CapacityClass>,
    position: Option<Position>,
    detail: Option<String>,
) -> AuditEvent {
    AuditEvent {
        event_id: uuid::Uuid::new_v4().to_string(),
        action,
        car_id: car_id.map(str::to_owned),
        capacity_class,
        position,
        created_at_ms: now_ms(),
        detail,
    }
}
