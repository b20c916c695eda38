//! OpenAI client implementation.

use std::fmt;
use std::sync::Arc;

use jiff::Timestamp;
use notra_core::{Error, Result};
use notra_service::{
    AudioRequest, AudioResponse, ImageRequest, ImageResponse, InferenceProvider, TextRequest,
    TextResponse,
};
use reqwest::Client as HttpClient;
use reqwest::multipart::{Form, Part};

use crate::api::{self, ChatCompletion};
use crate::{OpenAiConfig, TRACING_TARGET_CLIENT};

const USER_AGENT: &str = concat!("notra/", env!("CARGO_PKG_VERSION"));

/// Client for the OpenAI REST API.
///
/// Covers text generation, image analysis, and audio transcription.
/// The client performs no retries.
#[derive(Clone)]
pub struct OpenAiClient {
    http: HttpClient,
    config: Arc<OpenAiConfig>,
}

impl fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl OpenAiClient {
    /// Creates a client, failing fast when the API key is missing.
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        config.validate()?;
        if config.api_key.as_deref().is_none_or(str::is_empty) {
            return Err(Error::configuration().with_message("OPENAI_API_KEY is not set"));
        }

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            base_url = %config.base_url,
            model = %config.model,
            "Creating OpenAI client"
        );

        let http = HttpClient::builder()
            .timeout(config.timeout())
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| {
                Error::configuration()
                    .with_message("failed to build the OpenAI HTTP client")
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

    async fn send_chat(&self, payload: &api::ChatRequest) -> Result<ChatCompletion> {
        let url = format!("{}/chat/completions", self.config.endpoint());
        let response = self
            .http
            .post(url)
            .bearer_auth(self.api_key())
            .json(payload)
            .send()
            .await
            .map_err(transport_error)?;
        let response = check_status(response).await?;

        response.json::<ChatCompletion>().await.map_err(|err| {
            Error::provider_invalid_response()
                .with_message("OpenAI returned a malformed chat completion")
                .with_source(err)
        })
    }
}

#[async_trait::async_trait]
impl InferenceProvider for OpenAiClient {
    async fn generate_text(&self, request: &TextRequest) -> Result<TextResponse> {
        let started_at = Timestamp::now();
        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            request_id = %request.request_id,
            model = %self.config.model,
            "Sending chat completion request"
        );

        let payload = api::chat_request(&self.config.model, request);
        let completion = self.send_chat(&payload).await?;
        let content = completion.message_content()?;
        let ended_at = Timestamp::now();

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            request_id = %request.request_id,
            content_length = content.len(),
            elapsed_ms = ended_at.duration_since(started_at).as_millis(),
            "Chat completion received"
        );

        let model = completion.model.unwrap_or_else(|| self.config.model.clone());
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

        let payload = api::vision_request(&self.config.vision_model, request);
        let completion = self.send_chat(&payload).await?;
        let content = completion.message_content()?;
        let ended_at = Timestamp::now();

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            request_id = %request.request_id,
            content_length = content.len(),
            elapsed_ms = ended_at.duration_since(started_at).as_millis(),
            "Vision response received"
        );

        let model = completion
            .model
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
            model = %self.config.transcribe_model,
            audio_bytes = request.size(),
            "Sending transcription request"
        );

        let file = Part::bytes(request.audio.to_vec())
            .file_name(request.file_name())
            .mime_str(&request.mime_type)
            .map_err(|err| {
                Error::invalid_input()
                    .with_message(format!("invalid audio MIME type: {}", request.mime_type))
                    .with_source(err)
            })?;
        let form = Form::new()
            .text("model", self.config.transcribe_model.clone())
            .text("prompt", request.transcription_prompt())
            .text("response_format", "text")
            .part("file", file);

        let url = format!("{}/audio/transcriptions", self.config.endpoint());
        let response = self
            .http
            .post(url)
            .bearer_auth(self.api_key())
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;
        let response = check_status(response).await?;

        let transcript = response.text().await.map_err(|err| {
            Error::provider_invalid_response()
                .with_message("failed to read the transcription response")
                .with_source(err)
        })?;
        let ended_at = Timestamp::now();

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            request_id = %request.request_id,
            transcript_length = transcript.len(),
            elapsed_ms = ended_at.duration_since(started_at).as_millis(),
            "Transcription received"
        );

        Ok(request
            .reply(transcript)
            .with_model(self.config.transcribe_model.clone())
            .with_timing(started_at, ended_at))
    }
}

fn transport_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::provider_timeout()
            .with_message("OpenAI request timed out")
            .with_source(err)
    } else {
        Error::provider_unavailable()
            .with_message("failed to reach the OpenAI API")
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
        .with_message(format!("OpenAI API returned {status}: {body}")))
}

#[cfg(test)]
mod tests {
    use notra_core::ErrorKind;

    use super::*;

    #[test]
    fn test_missing_api_key_fails_fast() {
        let error = OpenAiClient::new(OpenAiConfig::default()).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Configuration);
        assert!(error.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_blank_api_key_fails_fast() {
        let config = OpenAiConfig {
            api_key: Some(String::new()),
            ..OpenAiConfig::default()
        };
        assert!(OpenAiClient::new(config).is_err());
    }

    #[test]
    fn test_client_debug_masks_api_key() {
        let config = OpenAiConfig {
            api_key: Some("sk-secret".to_owned()),
            ..OpenAiConfig::default()
        };
        let client = OpenAiClient::new(config).unwrap();
        assert!(!format!("{client:?}").contains("sk-secret"));
    }
}
