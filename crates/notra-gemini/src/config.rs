//! Gemini client configuration.

use std::fmt;
use std::time::Duration;

use notra_core::{Error, Result};
use serde::{Deserialize, Serialize};
use url::Url;

#[cfg(feature = "config")]
use clap::Args;

/// Configuration for the Gemini client.
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct GeminiConfig {
    /// API key used to authenticate with Gemini.
    #[cfg_attr(feature = "config", arg(long = "gemini-api-key", env = "GOOGLE_API_KEY"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of the Gemini API.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "gemini-base-url",
            env = "GEMINI_BASE_URL",
            default_value = "https://generativelanguage.googleapis.com/v1beta"
        )
    )]
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model used for text generation and audio transcription.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "gemini-model",
            env = "GEMINI_MODEL",
            default_value = "gemini-2.0-flash"
        )
    )]
    #[serde(default = "default_model")]
    pub model: String,

    /// Model used for image analysis.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "gemini-vision-model",
            env = "GEMINI_VISION_MODEL",
            default_value = "gemini-2.5-pro-preview-06-05"
        )
    )]
    #[serde(default = "default_vision_model")]
    pub vision_model: String,

    /// Request timeout in seconds.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "gemini-timeout-secs",
            env = "GEMINI_TIMEOUT_SECS",
            default_value = "60"
        )
    )]
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_owned()
}

fn default_model() -> String {
    "gemini-2.0-flash".to_owned()
}

fn default_vision_model() -> String {
    "gemini-2.5-pro-preview-06-05".to_owned()
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            vision_model: default_vision_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("vision_model", &self.vision_model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl GeminiConfig {
    /// Validates the configuration values.
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.base_url).map_err(|err| {
            Error::configuration()
                .with_message(format!("invalid Gemini base URL: {}", self.base_url))
                .with_source(err)
        })?;
        if self.model.is_empty() || self.vision_model.is_empty() {
            return Err(Error::configuration().with_message("Gemini model names must not be empty"));
        }
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(Error::configuration()
                .with_message("Gemini timeout must be between 1 and 300 seconds"));
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GeminiConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.model, "gemini-2.0-flash");
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let config = GeminiConfig {
            base_url: "::not-a-url::".to_owned(),
            ..GeminiConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_masks_api_key() {
        let config = GeminiConfig {
            api_key: Some("AIza-secret".to_owned()),
            ..GeminiConfig::default()
        };
        assert!(!format!("{config:?}").contains("AIza-secret"));
    }
}
