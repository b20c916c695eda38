//! Gemini client implementation.

use std::fmt;
use std::sync::Arc;

use jiff::Timestamp;
use notra_core::{Error, Result};
use notra_service::{
    AudioRequest, AudioResponse, ImageRequest, ImageResponse, InferenceProvider, TextRequest,
    TextResponse,
};
use reqwest::Client as HttpClient;

use crate::api::{self, GenerateContentResponse};
use crate::{GeminiConfig, TRACING_TARGET_CLIENT};

const USER_AGENT: &str = concat!("notra/", env!("CARGO_PKG_VERSION"));

/// Client for the Gemini `generateContent` REST API.
///
/// Covers text generation, image analysis, and audio transcription.
/// The client performs no retries.
#[derive(Clone)]
pub struct GeminiClient {
    http: HttpClient,
    config: Arc<GeminiConfig>,
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Creates a client, failing fast when the API key is missing.
    pub fn new(config: GeminiConfig) -> Result<Self> {
        config.validate()?;
        if config.api_key.as_deref().is_none_or(str::is_empty) {
            return Err(Error::configuration().with_message("GOOGLE_API_KEY is not set"));
        }

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            base_url = %config.base_url,
            model = %config.model,
            "Creating Gemini client"
        );

        let http = HttpClient::builder()
            .timeout(config.timeout())
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| {
                Error::configuration()
                    .with_message("failed to build the Gemini HTTP client")
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

    async fn generate(
        &self,
        model: &str,
        payload: &api::GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let url = format!("{}/models/{model}:generateContent", self.config.endpoint());
        let response = self
            .http
            .post(url)
            .header("x-goog-api-key", self.api_key())
            .json(payload)
            .send()
            .await
            .map_err(transport_error)?;
        let response = check_status(response).await?;

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|err| {
                Error::provider_invalid_response()
                    .with_message("Gemini returned a malformed generation response")
                    .with_source(err)
            })
    }
}

#[async_trait::async_trait]
impl InferenceProvider for GeminiClient {
    async fn generate_text(&self, request: &TextRequest) -> Result<TextResponse> {
        let started_at = Timestamp::now();
        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            request_id = %request.request_id,
            model = %self.config.model,
            "Sending generation request"
        );

        let payload = api::text_request(request);
        let generated = self.generate(&self.config.model, &payload).await?;
        let content = generated.text()?;
        let ended_at = Timestamp::now();

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            request_id = %request.request_id,
            content_length = content.len(),
            elapsed_ms = ended_at.duration_since(started_at).as_millis(),
            "Generation response received"
        );

        let model = generated
            .model_version
            .unwrap_or_else(|| self.config.model.clone());
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

        let payload = api::vision_request(request);
        let generated = self.generate(&self.config.vision_model, &payload).await?;
        let content = generated.text()?;
        let ended_at = Timestamp::now();

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            request_id = %request.request_id,
            content_length = content.len(),
            elapsed_ms = ended_at.duration_since(started_at).as_millis(),
            "Vision response received"
        );

        let model = generated
            .model_version
            .unwrap_or_else(|| self.config.vision_model.clone());
        Ok(request
            .reply(content)
            .with_model(model)
            .with_timing(started_at, ended_at))
    }

    async fn transcribe_audio(&self, request: &AudioRequest) -> Result<AudioResponse> {
        if request.audio.is_empty() {
            return Err(
                Error::invalid_input().with_message("audio transcription requires audio data")
            );
        }

        let started_at = Timestamp::now();
        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            request_id = %request.request_id,
            model = %self.config.model,
            audio_bytes = request.size(),
            "Sending transcription request"
        );

        let payload = api::transcription_request(request);
        let generated = self.generate(&self.config.model, &payload).await?;
        let transcript = generated.text()?;
        let ended_at = Timestamp::now();

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            request_id = %request.request_id,
            transcript_length = transcript.len(),
            elapsed_ms = ended_at.duration_since(started_at).as_millis(),
            "Transcription received"
        );

        let model = generated
            .model_version
            .unwrap_or_else(|| self.config.model.clone());
        Ok(request
            .reply(transcript)
            .with_model(model)
            .with_timing(started_at, ended_at))
    }
}

fn transport_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::provider_timeout()
            .with_message("Gemini request timed out")
            .with_source(err)
    } else {
        Error::provider_unavailable()
            .with_message("failed to reach the Gemini API")
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
        .with_message(format!("Gemini API returned {status}: {body}")))
}

#[cfg(test)]
mod tests {
    use notra_core::ErrorKind;

    use super::*;

    #[test]
    fn test_missing_api_key_fails_fast() {
        let error = GeminiClient::new(GeminiConfig::default()).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Configuration);
        assert!(error.to_string().contains("GOOGLE_API_KEY"));
    }

    #[test]
    fn test_client_debug_masks_api_key() {
        let config = GeminiConfig {
            api_key: Some("AIza-secret".to_owned()),
            ..GeminiConfig::default()
        };
        let client = GeminiClient::new(config).unwrap();
        assert!(!format!("{client:?}").contains("AIza-secret"));
    }
}
