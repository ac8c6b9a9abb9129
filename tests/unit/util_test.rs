//! Tests for utility functions

use taxi_dispatch::util::{now_ms, CapacityClass, Position, QueueId};

#[test]
fn test_capacity_class_ordering() {
    assert!(CapacityClass(8) > CapacityClass(7));
    assert!(CapacityClass(5) > CapacityClass(4));
    assert_eq!(CapacityClass::from(6), CapacityClass(6));
}

#[test]
fn test_capacity_class_fits() {
    assert!(CapacityClass(4).fits(1));
    assert!(CapacityClass(4).fits(4));
    assert!(!CapacityClass(4).fits(5));
    assert_eq!(CapacityClass(7).seats(), 7);
}

#[test]
fn test_capacity_class_deserializes_from_number() {
    let classes: Vec<CapacityClass> = serde_json::from_str("[4, 8]").unwrap();
    assert_eq!(classes, vec![CapacityClass(4), CapacityClass(8)]);
}

#[test]
fn test_position_and_queue_id() {
    let position: Position = 1;
    assert_eq!(position, 1);
    assert_ne!(QueueId::new_v4(), QueueId::new_v4());
}

#[test]
fn test_now_ms_is_monotonic_enough() {
    let a = now_ms();
    let b = now_ms();
    assert!(a > 0);
    assert!(b >= a);
}
