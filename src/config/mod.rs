//! Configuration models for the dispatcher, its stores and timeouts.

pub mod dispatch;

pub use dispatch::{parse_classes, DirectoryCapabilities, DispatchConfig, QueueBackendConfig};
