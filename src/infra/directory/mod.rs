//! Car directory adapters.

pub mod memory;

pub use memory::InMemoryCarDirectory;
