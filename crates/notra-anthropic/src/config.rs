//! Anthropic client configuration.

use std::fmt;
use std::time::Duration;

use notra_core::{Error, Result};
use serde::{Deserialize, Serialize};
use url::Url;

#[cfg(feature = "config")]
use clap::Args;

/// Configuration for the Anthropic client.
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct AnthropicConfig {
    /// API key used to authenticate with Anthropic.
    #[cfg_attr(
        feature = "config",
        arg(long = "anthropic-api-key", env = "ANTHROPIC_API_KEY")
    )]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of the Anthropic API.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "anthropic-base-url",
            env = "ANTHROPIC_BASE_URL",
            default_value = "https://api.anthropic.com"
        )
    )]
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model used for text generation.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "anthropic-model",
            env = "ANTHROPIC_MODEL",
            default_value = "claude-3-5-haiku-20241022"
        )
    )]
    #[serde(default = "default_model")]
    pub model: String,

    /// Model used for image analysis.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "anthropic-vision-model",
            env = "ANTHROPIC_VISION_MODEL",
            default_value = "claude-opus-4-20250514"
        )
    )]
    #[serde(default = "default_vision_model")]
    pub vision_model: String,

    /// Maximum tokens to generate when a request does not set its own limit.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "anthropic-max-tokens",
            env = "ANTHROPIC_MAX_TOKENS",
            default_value = "1024"
        )
    )]
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Request timeout in seconds.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "anthropic-timeout-secs",
            env = "ANTHROPIC_TIMEOUT_SECS",
            default_value = "60"
        )
    )]
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.anthropic.com".to_owned()
}

fn default_model() -> String {
    "claude-3-5-haiku-20241022".to_owned()
}

fn default_vision_model() -> String {
    "claude-opus-4-20250514".to_owned()
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            vision_model: default_vision_model(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl fmt::Debug for AnthropicConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnthropicConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("vision_model", &self.vision_model)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl AnthropicConfig {
    /// Validates the configuration values.
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.base_url).map_err(|err| {
            Error::configuration()
                .with_message(format!("invalid Anthropic base URL: {}", self.base_url))
                .with_source(err)
        })?;
        if self.model.is_empty() || self.vision_model.is_empty() {
            return Err(
                Error::configuration().with_message("Anthropic model names must not be empty")
            );
        }
        if self.max_tokens == 0 {
            return Err(Error::configuration()
                .with_message("Anthropic max tokens must be greater than zero"));
        }
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(Error::configuration()
                .with_message("Anthropic timeout must be between 1 and 300 seconds"));
        }
        Ok(())
    }

    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Base URL without a trailing slash.
    pub fn endpoint(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}
