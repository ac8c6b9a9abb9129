//! Tests for audit sink

use taxi_dispatch::core::{build_audit_event, AuditAction, AuditSink, InMemoryAuditSink};
use taxi_dispatch::util::CapacityClass;

#[test]
fn test_in_memory_audit_sink() {
    let sink = InMemoryAuditSink::new(10);

    let event = build_audit_event(
        AuditAction::Enqueue,
        Some("car1"),
        Some(CapacityClass(4)),
        Some(1),
        None,
    );

    sink.record(event.clone());
    assert_eq!(sink.events().len(), 1);

    let events = sink.events();
    assert_eq!(events[0], event);
    assert_eq!(events[0].car_id.as_deref(), Some("car1"));
    assert_eq!(events[0].action, AuditAction::Enqueue);
}

#[test]
fn test_audit_sink_overflow() {
    let sink = InMemoryAuditSink::new(2);

    sink.record(build_audit_event(AuditAction::Enqueue, Some("car1"), None, None, None));
    sink.record(build_audit_event(AuditAction::Enqueue, Some("car2"), None, None, None));
    sink.record(build_audit_event(AuditAction::Assign, Some("car3"), None, None, None));

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].car_id.as_deref(), Some("car2")); // First one popped
    assert_eq!(events[1].action, AuditAction::Assign);
}

#[test]
fn test_build_audit_event() {
    let event = build_audit_event(
        AuditAction::Clear,
        None,
        Some(CapacityClass(8)),
        None,
        Some("removed=3".to_string()),
    );

    assert!(!event.event_id.is_empty());
    assert_eq!(event.car_id, None);
    assert_eq!(event.capacity_class, Some(CapacityClass(8)));
    assert_eq!(event.detail, Some("removed=3".to_string()));
    assert!(event.created_at_ms > 0);

    let other = build_audit_event(AuditAction::Clear, None, None, None, None);
    assert_ne!(event.event_id, other.event_id);
}

#[test]
fn test_audit_event_serializes() {
    let event = build_audit_event(AuditAction::Repair, None, Some(CapacityClass(6)), None, None);
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["action"], "repair");
    assert_eq!(json["capacity_class"], 6);
}
