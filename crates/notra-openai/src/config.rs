//! OpenAI client configuration.

use std::fmt;
use std::time::Duration;

use notra_core::{Error, Result};
use serde::{Deserialize, Serialize};
use url::Url;

#[cfg(feature = "config")]
use clap::Args;

/// Configuration for the OpenAI client.
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct OpenAiConfig {
    /// API key used to authenticate with OpenAI.
    #[cfg_attr(feature = "config", arg(long = "openai-api-key", env = "OPENAI_API_KEY"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of the OpenAI API.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "openai-base-url",
            env = "OPENAI_BASE_URL",
            default_value = "https://api.openai.com/v1"
        )
    )]
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model used for text generation.
    #[cfg_attr(
        feature = "config",
        arg(long = "openai-model", env = "OPENAI_MODEL", default_value = "gpt-4o-mini")
    )]
    #[serde(default = "default_model")]
    pub model: String,

    /// Model used for image analysis.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "openai-vision-model",
            env = "OPENAI_VISION_MODEL",
            default_value = "gpt-4.1"
        )
    )]
    #[serde(default = "default_vision_model")]
    pub vision_model: String,

    /// Model used for audio transcription.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "openai-transcribe-model",
            env = "OPENAI_TRANSCRIBE_MODEL",
            default_value = "gpt-4o-transcribe"
        )
    )]
    #[serde(default = "default_transcribe_model")]
    pub transcribe_model: String,

    /// Request timeout in seconds.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "openai-timeout-secs",
            env = "OPENAI_TIMEOUT_SECS",
            default_value = "60"
        )
    )]
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_owned()
}

fn default_model() -> String {
    "gpt-4o-mini".to_owned()
}

fn default_vision_model() -> String {
    "gpt-4.1".to_owned()
}

fn default_transcribe_model() -> String {
    "gpt-4o-transcribe".to_owned()
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            vision_model: default_vision_model(),
            transcribe_model: default_transcribe_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("vision_model", &self.vision_model)
            .field("transcribe_model", &self.transcribe_model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl OpenAiConfig {
    /// Validates the configuration values.
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.base_url).map_err(|err| {
            Error::configuration()
                .with_message(format!("invalid OpenAI base URL: {}", self.base_url))
                .with_source(err)
        })?;
        if self.model.is_empty() || self.vision_model.is_empty() || self.transcribe_model.is_empty()
        {
            return Err(Error::configuration().with_message("OpenAI model names must not be empty"));
        }
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(Error::configuration()
                .with_message("OpenAI timeout must be between 1 and 300 seconds"));
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
        let config = OpenAiConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let config = OpenAiConfig {
            base_url: "not a url".to_owned(),
            ..OpenAiConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let config = OpenAiConfig {
            timeout_secs: 0,
            ..OpenAiConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_masks_api_key() {
        let config = OpenAiConfig {
            api_key: Some("sk-secret".to_owned()),
            ..OpenAiConfig::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("***"));
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let config = OpenAiConfig {
            base_url: "https://api.openai.com/v1/".to_owned(),
            ..OpenAiConfig::default()
        };
        assert_eq!(config.endpoint(), "https://api.openai.com/v1");
    }
}
