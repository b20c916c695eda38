//! gRPC server startup and lifecycle management.

use notra_server::proto::health_service_server::HealthServiceServer;
use notra_server::proto::note_service_server::NoteServiceServer;
use notra_server::{Authenticator, HealthGateway, NoteGateway};
use notra_service::{BatchOrchestrator, InferenceService};
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;

use crate::config::Cli;
use crate::server::{
    ServerError, ServerResult, TRACING_TARGET_SHUTDOWN, TRACING_TARGET_STARTUP, shutdown_signal,
};

/// Starts the gRPC server with graceful shutdown.
///
/// This function validates the configuration, wires the note and health
/// services behind the API key interceptor, binds to the specified address,
/// and serves requests until a shutdown signal arrives.
///
/// # Errors
///
/// Returns an error if:
/// - Server configuration is invalid
/// - Cannot bind to the specified address/port
/// - Server encounters a fatal error during operation
pub(crate) async fn serve_grpc(service: InferenceService, cli: Cli) -> ServerResult<()> {
    let server_config = &cli.server;

    // Validate configuration before starting
    if let Err(validation_error) = server_config.validate() {
        tracing::error!(
            target: TRACING_TARGET_STARTUP,
            error = %validation_error,
            "Invalid server configuration"
        );

        return Err(ServerError::InvalidConfig(validation_error.to_string()));
    }

    let policy = cli.batch.notes_failure_policy;
    let orchestrator = BatchOrchestrator::new(service, cli.batch.clone());

    let authenticator = Authenticator::from_config(&cli.auth);
    let note_gateway = NoteGateway::new(orchestrator, policy);
    let health_gateway = HealthGateway::new(authenticator.clone(), cli.auth.health_requires_auth);

    let reflection = tonic_reflection::server::Builder::configure()
        .register_encoded_file_descriptor_set(notra_server::proto::FILE_DESCRIPTOR_SET)
        .build()
        .map_err(ServerError::Reflection)?;

    let server_addr = server_config.server_addr();

    // Bind to the address with error handling
    let listener = match TcpListener::bind(server_addr).await {
        Ok(listener) => {
            tracing::info!(
                target: TRACING_TARGET_STARTUP,
                addr = %server_addr,
                "Successfully bound to address"
            );

            listener
        }
        Err(listener_err) => {
            let error = ServerError::Bind {
                address: server_addr.to_string(),
                source: listener_err,
            };

            tracing::error!(
                target: TRACING_TARGET_STARTUP,
                addr = %server_addr,
                error = %error,
                recoverable = error.is_recoverable(),
                suggestion = error.suggestion(),
                "Failed to bind to address"
            );

            return Err(error);
        }
    };

    tracing::info!(
        target: TRACING_TARGET_STARTUP,
        addr = %server_addr,
        "Server is ready and listening for connections"
    );

    if server_config.binds_to_all_interfaces() {
        tracing::warn!(
            target: TRACING_TARGET_STARTUP,
            "Server is bound to all interfaces. Ensure firewall rules are properly configured."
        );
    }

    let incoming = TcpListenerStream::new(listener);

    Server::builder()
        .timeout(server_config.request_timeout())
        .add_service(NoteServiceServer::with_interceptor(
            note_gateway,
            authenticator,
        ))
        .add_service(HealthServiceServer::new(health_gateway))
        .add_service(reflection)
        .serve_with_incoming_shutdown(incoming, shutdown_signal(server_config.shutdown_timeout()))
        .await
        .map_err(|err| {
            let error = ServerError::Runtime(err);
            tracing::error!(
                target: TRACING_TARGET_SHUTDOWN,
                error = %error,
                error_code = error.error_code(),
                "Server encountered an error"
            );
            error
        })?;

    tracing::info!(target: TRACING_TARGET_SHUTDOWN, "Server shut down gracefully");
    Ok(())
}
