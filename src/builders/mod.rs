//! Builders to construct a dispatcher from configuration.

pub mod dispatcher_builder;

pub use dispatcher_builder::{build_audited_dispatcher, build_dispatcher, configured_queue};
