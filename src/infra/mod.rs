//! Infrastructure adapters for queue stores and the car directory.

pub mod directory;
pub mod queue;

pub use directory::InMemoryCarDirectory;
pub use queue::{FileCapacityQueue, InMemoryCapacityQueue};
