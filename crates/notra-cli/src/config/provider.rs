//! Inference provider selection and construction.

use anyhow::Context;
use clap::{Args, ValueEnum};
use notra_anthropic::AnthropicClient;
use notra_gemini::GeminiClient;
use notra_openai::OpenAiClient;
use notra_service::InferenceService;
#[cfg(feature = "mock")]
use notra_service::MockProvider;
use serde::{Deserialize, Serialize};

use super::Cli;

/// Which inference provider backs the gateway.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[value(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// OpenAI chat completion and transcription APIs.
    #[default]
    OpenAi,
    /// Anthropic Messages API (text and vision only).
    Anthropic,
    /// Google Gemini generateContent API.
    Gemini,
    /// Deterministic canned replies for local testing.
    #[cfg(feature = "mock")]
    Mock,
}

/// Inference provider selection.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Inference provider that serves note generation requests.
    #[arg(long, env = "INFERENCE_PROVIDER", value_enum, default_value_t = ProviderKind::OpenAi)]
    #[serde(default)]
    pub provider: ProviderKind,
}

/// Creates the inference service selected by CLI configuration.
///
/// Only the active provider's client is constructed, so credentials for
/// the other vendors may be left unset.
///
/// # Errors
///
/// Returns an error if the selected provider's configuration is invalid
/// or its API key is missing.
pub fn create_provider(cli: &Cli) -> anyhow::Result<InferenceService> {
    match cli.provider.provider {
        ProviderKind::OpenAi => {
            let client =
                OpenAiClient::new(cli.openai.clone()).context("failed to create OpenAI client")?;
            Ok(InferenceService::from_provider(client))
        }
        ProviderKind::Anthropic => {
            let client = AnthropicClient::new(cli.anthropic.clone())
                .context("failed to create Anthropic client")?;
            Ok(InferenceService::from_provider(client))
        }
        ProviderKind::Gemini => {
            let client =
                GeminiClient::new(cli.gemini.clone()).context("failed to create Gemini client")?;
            Ok(InferenceService::from_provider(client))
        }
        #[cfg(feature = "mock")]
        ProviderKind::Mock => Ok(MockProvider::new(cli.mock.clone()).into_service()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_provider_is_openai() {
        assert_eq!(ProviderKind::default(), ProviderKind::OpenAi);
    }

    #[test]
    fn provider_parses_from_lowercase_names() {
        assert_eq!(
            ProviderKind::from_str("openai", true).ok(),
            Some(ProviderKind::OpenAi)
        );
        assert_eq!(
            ProviderKind::from_str("anthropic", true).ok(),
            Some(ProviderKind::Anthropic)
        );
        assert_eq!(
            ProviderKind::from_str("gemini", true).ok(),
            Some(ProviderKind::Gemini)
        );
    }
}
