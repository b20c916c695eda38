//! gRPC server startup with lifecycle management.
//!
//! This module provides a clean API for starting the gateway's gRPC server
//! with enhanced error handling and graceful shutdown support. The server
//! wires the authenticated note and health services together with gRPC
//! reflection for discoverability.

/// Tracing target for server startup events.
pub const TRACING_TARGET_STARTUP: &str = "notra_cli::server::startup";

/// Tracing target for server shutdown events.
pub const TRACING_TARGET_SHUTDOWN: &str = "notra_cli::server::shutdown";

mod error;
mod grpc_server;
mod shutdown;

pub use error::{ServerError, ServerResult};
use grpc_server::serve_grpc;
use notra_service::InferenceService;
use shutdown::shutdown_signal;

use crate::config::Cli;

/// Starts the gRPC server for the given inference service.
///
/// # Arguments
///
/// * `service` - The inference service that backs note generation
/// * `cli` - Complete gateway configuration
///
/// # Errors
///
/// Returns an error if:
/// - Server configuration is invalid
/// - Cannot bind to the specified address/port
/// - Reflection registration fails
/// - Server encounters a fatal error during operation
pub async fn serve(service: InferenceService, cli: Cli) -> ServerResult<()> {
    serve_grpc(service, cli).await
}
