//! CLI configuration management.
//!
//! This module defines the complete CLI configuration hierarchy:
//!
//! ```text
//! Cli
//! ├── server: ServerConfig         # Host, port, timeouts
//! ├── auth: AuthConfig             # API key allow-list, health gating
//! ├── batch: BatchConfig           # Fan-out limits, failure policy
//! ├── provider: ProviderConfig     # Active inference provider
//! ├── openai: OpenAiConfig         # OpenAI credentials and models
//! ├── anthropic: AnthropicConfig   # Anthropic credentials and models
//! └── gemini: GeminiConfig         # Gemini credentials and models
//! ```
//!
//! All configuration can be provided via CLI arguments or environment variables.
//! Use `--help` to see all available options.
//!
//! # Example
//!
//! ```bash
//! # Configure API keys and server binding
//! notra --api-key "secret" --port 50052
//!
//! # Or via environment variables
//! GRPC_API_KEYS="secret" PORT=50052 notra
//! ```

mod provider;
mod server;

use anyhow::Context;
use clap::Parser;
use notra_anthropic::AnthropicConfig;
use notra_gemini::GeminiConfig;
use notra_openai::OpenAiConfig;
use notra_server::auth::AuthConfig;
use notra_service::batch::BatchConfig;
pub use provider::{ProviderConfig, ProviderKind, create_provider};
use serde::{Deserialize, Serialize};
pub use server::{ServerConfig, log_server_config};

/// Complete CLI configuration.
///
/// Combines all configuration groups for the Notra gateway:
/// - [`ServerConfig`]: Network binding and lifecycle timeouts
/// - [`AuthConfig`]: API key allow-list and health endpoint gating
/// - [`BatchConfig`]: Note batch fan-out and failure policy
/// - [`ProviderConfig`]: Which inference provider serves requests
/// - Vendor configs: Credentials and model names per provider
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(name = "notra")]
#[command(about = "Notra inference gateway server")]
#[command(version)]
pub struct Cli {
    /// Server network and lifecycle configuration.
    #[clap(flatten)]
    pub server: ServerConfig,

    /// API key authentication configuration.
    #[clap(flatten)]
    pub auth: AuthConfig,

    /// Note batch orchestration configuration.
    #[clap(flatten)]
    pub batch: BatchConfig,

    /// Inference provider selection.
    #[clap(flatten)]
    pub provider: ProviderConfig,

    /// OpenAI credentials and model configuration.
    #[clap(flatten)]
    pub openai: OpenAiConfig,

    /// Anthropic credentials and model configuration.
    #[clap(flatten)]
    pub anthropic: AnthropicConfig,

    /// Gemini credentials and model configuration.
    #[clap(flatten)]
    pub gemini: GeminiConfig,

    /// Mock provider configuration for local testing.
    #[cfg(feature = "mock")]
    #[clap(flatten)]
    pub mock: notra_service::MockConfig,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    ///
    /// This is the preferred way to initialize the CLI configuration as it ensures
    /// .env files are loaded before clap parses arguments, allowing environment
    /// variables from .env to be used as defaults.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    ///
    /// This should be called before parsing CLI arguments so that clap's `env`
    /// feature can pick up values from .env files.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Validates all configuration values.
    ///
    /// Vendor credentials are checked later, when the selected provider's
    /// client is constructed.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.server
            .validate()
            .context("invalid server configuration")?;
        self.auth
            .validate()
            .context("invalid authentication configuration")?;
        self.batch
            .validate()
            .context("invalid batch configuration")?;
        Ok(())
    }
}
