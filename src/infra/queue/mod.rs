//! Capacity queue backends.

pub mod file;
pub mod memory;

pub use file::FileCapacityQueue;
pub use memory::InMemoryCapacityQueue;
