//! # Taxi Dispatch
//!
//! The dispatch core of a taxi rank: one FIFO queue per vehicle-capacity
//! class, and an allocation engine that matches a passenger-count request to
//! the best-fitting waiting vehicle.
//!
//! ## Core Problem Solved
//!
//! A rank (an airport, a station) holds vehicles of a few fixed sizes. Drivers
//! join the queue for their size and expect to leave in arrival order;
//! passengers expect a car big enough for their party without waiting on a
//! perfect fit. Admissions and bookings arrive concurrently against one shared
//! store with no cross-class lock.
//!
//! ## Key Features
//!
//! - **Per-Class FIFO**: positions `1..=N` per class, protected by store-level
//!   uniqueness instead of a lock
//! - **Bounded Optimistic Admission**: position collisions are retried a fixed
//!   number of times, then surfaced as congestion
//! - **Optimal-Then-Move-Up Allocation**: the smallest class seating the party
//!   is preferred; larger classes are used only when it is empty; smaller ones
//!   never are
//! - **Remove-And-Verify**: every dispatch re-reads the store before reporting
//!   success
//! - **Position Repair**: idempotent, order-preserving renumbering after
//!   removals
//! - **Pluggable Stores**: in-memory and JSON-lines file queues behind one
//!   trait, plus an injected car directory
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use taxi_dispatch::builders::{build_dispatcher, configured_queue};
//! use taxi_dispatch::config::DispatchConfig;
//! use taxi_dispatch::core::CarRecord;
//! use taxi_dispatch::infra::InMemoryCarDirectory;
//! use taxi_dispatch::util::CapacityClass;
//!
//! let directory = Arc::new(InMemoryCarDirectory::from_records([
//!     CarRecord::active("car-17", CapacityClass(6)),
//! ]));
//! let dispatcher = build_dispatcher(&DispatchConfig::default(), configured_queue, directory)?;
//!
//! dispatcher.enqueue("car-17").await?;
//! let assignment = dispatcher.assign(3).await?; // move-up: 4-seaters are empty
//! assert_eq!(assignment.capacity_class, CapacityClass(6));
//! ```
//!
//! For complete scenarios, see `tests/dispatch_scenarios_test.rs`.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Dispatch components: queues, allocator, repairer, engine and facade.
pub mod core;
/// Configuration models for the dispatcher, stores and timeouts.
pub mod config;
/// Builders to construct a dispatcher from configuration.
pub mod builders;
/// Infrastructure adapters for queue stores and the car directory.
pub mod infra;
/// Shared utilities.
pub mod util;
