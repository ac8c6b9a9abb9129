//! Error types for dispatch operations and the stores behind them.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::util::serde::{CapacityClass, CarId, Position};

/// Failures raised by queue stores and the car directory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The `(class, position)` slot is already occupied by another entry.
    #[error("position {position} already taken in class {class}")]
    Collision {
        /// Class whose position sequence collided.
        class: CapacityClass,
        /// Contended position.
        position: Position,
    },
    /// The car already holds a live entry in this queue.
    #[error("car {0} already has a queue entry")]
    DuplicateCar(CarId),
    /// A single round-trip exceeded its deadline.
    #[error("{op} timed out after {after:?}")]
    Timeout {
        /// Store operation that timed out.
        op: &'static str,
        /// Deadline that was exceeded.
        after: Duration,
    },
    /// Backend-specific failure with context.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Outcomes surfaced by the dispatch operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// Referenced car does not exist in the directory.
    #[error("car {0} not found")]
    NotFound(CarId),
    /// Car exists but is inactive.
    #[error("car {0} is suspended")]
    Suspended(CarId),
    /// Car already has a live entry in some class queue.
    #[error("car {0} is already queued")]
    AlreadyQueued(CarId),
    /// Passenger count or capacity class outside the supported range.
    #[error("unsupported capacity: {0}")]
    InvalidCapacity(u32),
    /// Position allocation exhausted its retry bound.
    #[error("congestion in class {class}: no free position after {attempts} attempts")]
    Congestion {
        /// Class the car was being admitted to.
        class: CapacityClass,
        /// Insert attempts made before giving up.
        attempts: u32,
    },
    /// No class from the optimal one upward had a vehicle to hand out.
    #[error("no vehicle available for {passengers} passengers")]
    NoAvailableVehicle {
        /// Requested passenger count.
        passengers: u32,
    },
    /// Transient I/O or verification failure against the store.
    #[error("store error: {0}")]
    Store(String),
    /// Dispatcher could not be constructed from the given configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<StoreError> for DispatchError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateCar(car_id) => Self::AlreadyQueued(car_id),
            other => Self::Store(other.to_string()),
        }
    }
}

/// How a failure should be presented to the end user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Transient; the caller should offer "try again".
    TryAgain,
    /// Legitimate business outcome: nothing to hand out right now.
    Unavailable,
    /// The request itself was wrong.
    InvalidInput,
}

impl DispatchError {
    /// User-facing category of this error.
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Congestion { .. } | Self::Store(_) => ErrorCategory::TryAgain,
            Self::NoAvailableVehicle { .. } => ErrorCategory::Unavailable,
            Self::NotFound(_)
            | Self::Suspended(_)
            | Self::AlreadyQueued(_)
            | Self::InvalidCapacity(_)
            | Self::InvalidConfig(_) => ErrorCategory::InvalidInput,
        }
    }

    /// Whether repeating the whole call later may succeed.
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::TryAgain | ErrorCategory::Unavailable
        )
    }
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
