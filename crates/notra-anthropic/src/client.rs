//! Anthropic client implementation.

use std::fmt;
use std::sync::Arc;

use jiff::Timestamp;
use notra_core::{Error, Result};
use notra_service::{
    AudioRequest, AudioResponse, ImageRequest, ImageResponse, InferenceProvider, TextRequest,
    TextResponse,
};
use reqwest::Client as HttpClient;

use crate::api::{self, ANTHROPIC_VERSION, MessagesResponse};
use crate::{AnthropicConfig, TRACING_TARGET_CLIENT};

const USER_AGENT: &str = concat!("notra/", env!("CARGO_PKG_VERSION"));

/// Client for the Anthropic Messages API.
///
/// Covers text generation and image analysis. The Messages API has no
/// transcription endpoint, so audio requests are rejected. The client
/// performs no retries.
#[derive(Clone)]
pub struct AnthropicClient {
    http: HttpClient,
    config: Arc<AnthropicConfig>,
}

impl fmt::Debug for AnthropicClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnthropicClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AnthropicClient {
    /// Creates a client, failing fast when the API key is missing.
    pub fn new(config: AnthropicConfig) -> Result<Self> {
        config.validate()?;
        if config.api_key.as_deref().is_none_or(str::is_empty) {
            return Err(Error::configuration().with_message("ANTHROPIC_API_KEY is not set"));
        }

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            base_url = %config.base_url,
            model = %config.model,
            "Creating Anthropic client"
        );

        let http = HttpClient::builder()
            .timeout(config.timeout())
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| {
                Error::configuration()
                    .with_message("failed to build the Anthropic HTTP client")
                    .with_source(err)
            })?;

        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    fn api_key(&self) -> &str {
        self.config.api_key.as_deref().unwrap_or_default()
    }

    async fn send_messages(&self, payload: &api::MessagesRequest) -> Result<MessagesResponse> {
        let url = format!("{}/v1/messages", self.config.endpoint());
        let response = self
            .http
            .post(url)
            .header("x-api-key", self.api_key())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(payload)
            .send()
            .await
            .map_err(transport_error)?;
        let response = check_status(response).await?;

        response.json::<MessagesResponse>().await.map_err(|err| {
            Error::provider_invalid_response()
                .with_message("Anthropic returned a malformed messages response")
                .with_source(err)
        })
    }
}

#[async_trait::async_trait]
impl InferenceProvider for AnthropicClient {
    async fn generate_text(&self, request: &TextRequest) -> Result<TextResponse> {
        let started_at = Timestamp::now();
        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            request_id = %request.request_id,
            model = %self.config.model,
            "Sending messages request"
        );

        let payload = api::text_request(&self.config.model, self.config.max_tokens, request);
        let messages = self.send_messages(&payload).await?;
        let content = messages.text()?;
        let ended_at = Timestamp::now();

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            request_id = %request.request_id,
            content_length = content.len(),
            elapsed_ms = ended_at.duration_since(started_at).as_millis(),
            "Messages response received"
        );

        let model = messages.model.unwrap_or_else(|| self.config.model.clone());
        Ok(request
            .reply(content)
            .with_model(model)
            .with_timing(started_at, ended_at))
    }

    async fn analyze_image(&self, request: &ImageRequest) -> Result<ImageResponse> {
        if !request.has_images() {
            return Err(
                Error::invalid_input().with_message("image analysis requires at least one image")
            );
        }

        let started_at = Timestamp::now();
        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            request_id = %request.request_id,
            model = %self.config.vision_model,
            images = request.image_count(),
            "Sending vision request"
        );

        let payload =
            api::vision_request(&self.config.vision_model, self.config.max_tokens, request);
        let messages = self.send_messages(&payload).await?;
        let content = messages.text()?;
        let ended_at = Timestamp::now();

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            request_id = %request.request_id,
            content_length = content.len(),
            elapsed_ms = ended_at.duration_since(started_at).as_millis(),
            "Vision response received"
        );

        let model = messages
            .model
            .unwrap_or_else(|| self.config.vision_model.clone());
        Ok(request
            .reply(content)
            .with_model(model)
            .with_timing(started_at, ended_at))
    }

    async fn transcribe_audio(&self, request: &AudioRequest) -> Result<AudioResponse> {
        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            request_id = %request.request_id,
            "Rejecting transcription request"
        );

        Err(Error::invalid_input()
            .with_message("the Anthropic provider does not support audio transcription"))
    }
}

fn transport_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::provider_timeout()
            .with_message("Anthropic request timed out")
            .with_source(err)
    } else {
        Error::provider_unavailable()
            .with_message("failed to reach the Anthropic API")
            .with_source(err)
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(Error::provider_unavailable()
        .with_message(format!("Anthropic API returned {status}: {body}")))
}

#[cfg(test)]
mod tests {
    use notra_core::ErrorKind;

    use super::*;

    #[test]
    fn test_missing_api_key_fails_fast() {
        let error = AnthropicClient::new(AnthropicConfig::default()).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Configuration);
        assert!(error.to_string().contains("ANTHROPIC_API_KEY"));
    }

    #[tokio::test]
    async fn test_audio_transcription_is_rejected() {
        let config = AnthropicConfig {
            api_key: Some("sk-ant-test".to_owned()),
            ..AnthropicConfig::default()
        };
        let client = AnthropicClient::new(config).unwrap();

        let request = AudioRequest::new("Recording", vec![0u8; 4]);
        let error = client.transcribe_audio(&request).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidInput);
    }
}
