//! Tests for error types

use std::time::Duration;

use taxi_dispatch::core::{DispatchError, ErrorCategory, StoreError};
use taxi_dispatch::util::CapacityClass;

#[test]
fn test_not_found_error() {
    let err = DispatchError::NotFound("car-9".to_string());
    assert_eq!(format!("{}", err), "car car-9 not found");
}

#[test]
fn test_congestion_error() {
    let err = DispatchError::Congestion {
        class: CapacityClass(5),
        attempts: 3,
    };
    assert_eq!(
        format!("{}", err),
        "congestion in class 5-seater: no free position after 3 attempts"
    );
    assert_eq!(err.category(), ErrorCategory::TryAgain);
    assert!(err.is_retryable());
}

#[test]
fn test_no_available_vehicle_error() {
    let err = DispatchError::NoAvailableVehicle { passengers: 6 };
    assert_eq!(format!("{}", err), "no vehicle available for 6 passengers");
    assert_eq!(err.category(), ErrorCategory::Unavailable);
}

#[test]
fn test_admission_errors_are_invalid_input() {
    for err in [
        DispatchError::NotFound("a".into()),
        DispatchError::Suspended("a".into()),
        DispatchError::AlreadyQueued("a".into()),
        DispatchError::InvalidCapacity(11),
    ] {
        assert_eq!(err.category(), ErrorCategory::InvalidInput);
        assert!(!err.is_retryable());
    }
}

#[test]
fn test_store_timeout_becomes_store_error() {
    let err: DispatchError = StoreError::Timeout {
        op: "insert",
        after: Duration::from_millis(250),
    }
    .into();
    assert_eq!(err, DispatchError::Store("insert timed out after 250ms".into()));
    assert_eq!(err.category(), ErrorCategory::TryAgain);
}

#[test]
fn test_collision_becomes_store_error() {
    let err: DispatchError = StoreError::Collision {
        class: CapacityClass(4),
        position: 2,
    }
    .into();
    assert_eq!(
        format!("{}", err),
        "store error: position 2 already taken in class 4-seater"
    );
}

#[test]
fn test_category_serializes_snake_case() {
    let json = serde_json::to_string(&ErrorCategory::TryAgain).unwrap();
    assert_eq!(json, "\"try_again\"");
}
