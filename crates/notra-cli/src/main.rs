#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod server;

use std::process;

use anyhow::Context;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{Cli, create_provider, log_server_config};

// Tracing target constants
pub const TRACING_TARGET_SERVER_STARTUP: &str = "notra_cli::server::startup";
pub const TRACING_TARGET_SERVER_SHUTDOWN: &str = "notra_cli::server::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "notra_cli::config";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            "application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error = %error,
            "application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    init_tracing();
    log_startup_info();
    log_server_config(&cli.server);

    cli.validate().context("invalid configuration")?;

    log_gateway_config(&cli);

    let service = create_provider(&cli).context("failed to create inference provider")?;
    server::serve(service, cli).await?;

    Ok(())
}

/// Initializes tracing with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Logs startup information.
fn log_startup_info() {
    tracing::info!(
        target: TRACING_TARGET_SERVER_STARTUP,
        version = env!("CARGO_PKG_VERSION"),
        "starting notra gateway"
    );

    tracing::debug!(
        target: TRACING_TARGET_SERVER_STARTUP,
        pid = process::id(),
        arch = std::env::consts::ARCH,
        os = std::env::consts::OS,
        features = ?enabled_features(),
        "build information"
    );
}

/// Logs gateway configuration (no sensitive information).
fn log_gateway_config(cli: &Cli) {
    tracing::info!(
        target: TRACING_TARGET_CONFIG,
        provider = ?cli.provider.provider,
        max_concurrency = cli.batch.max_concurrency,
        item_timeout_secs = cli.batch.item_timeout_secs,
        failure_policy = %cli.batch.notes_failure_policy,
        api_keys = cli.auth.api_keys.len(),
        health_requires_auth = cli.auth.health_requires_auth,
        "gateway configuration"
    );
}

/// Returns a list of enabled compile-time features.
fn enabled_features() -> Vec<&'static str> {
    [
        cfg!(feature = "mock").then_some("mock"),
        cfg!(feature = "dotenv").then_some("dotenv"),
    ]
    .into_iter()
    .flatten()
    .collect()
}
