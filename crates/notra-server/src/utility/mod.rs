//! Shared helpers for the server crate.

pub mod tracing_targets;
