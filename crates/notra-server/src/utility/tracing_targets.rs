//! Tracing targets for structured log filtering.

/// Authentication operations (key checks, rejections)
pub const TRACING_TARGET_AUTHENTICATION: &str = "notra_server::authentication";

/// Note generation request handling
pub const TRACING_TARGET_NOTES: &str = "notra_server::notes";

/// Health endpoint handling
pub const TRACING_TARGET_HEALTH: &str = "notra_server::health";
