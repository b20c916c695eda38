use std::fmt;
use std::sync::Arc;

use jiff::Timestamp;
use notra_core::Result;

use super::{
    AudioRequest, AudioResponse, ImageRequest, ImageResponse, InferenceProvider, TRACING_TARGET,
    TextRequest, TextResponse,
};

/// Provider wrapper that traces every call.
///
/// Wraps an [`InferenceProvider`] and emits structured debug and error
/// events with request identifiers and elapsed time. All provider
/// access in the workspace goes through this type.
#[derive(Clone)]
pub struct InferenceService {
    provider: Arc<dyn InferenceProvider>,
}

impl fmt::Debug for InferenceService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InferenceService").finish_non_exhaustive()
    }
}

impl InferenceService {
    /// Creates a service from a concrete provider.
    pub fn from_provider<P: InferenceProvider + 'static>(provider: P) -> Self {
        Self {
            provider: Arc::new(provider),
        }
    }

    /// Creates a service backed by a mock provider with default config.
    #[cfg(any(test, feature = "test-utils"))]
    #[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
    pub fn mock() -> Self {
        Self::from_provider(super::MockProvider::default())
    }

    /// Generates text, tracing the outcome.
    pub async fn generate_text(&self, request: &TextRequest) -> Result<TextResponse> {
        let started_at = Timestamp::now();
        tracing::debug!(
            target: TRACING_TARGET,
            request_id = %request.request_id,
            label = %request.label,
            "Processing text generation request"
        );

        let result = self.provider.generate_text(request).await;
        let elapsed = Timestamp::now().duration_since(started_at);

        match &result {
            Ok(response) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    request_id = %request.request_id,
                    response_id = %response.response_id,
                    content_length = response.content_length(),
                    elapsed_ms = elapsed.as_millis(),
                    "Text generation successful"
                );
            }
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    request_id = %request.request_id,
                    error = %error,
                    elapsed_ms = elapsed.as_millis(),
                    "Text generation failed"
                );
            }
        }

        result
    }

    /// Analyzes images, tracing the outcome.
    pub async fn analyze_image(&self, request: &ImageRequest) -> Result<ImageResponse> {
        let started_at = Timestamp::now();
        tracing::debug!(
            target: TRACING_TARGET,
            request_id = %request.request_id,
            label = %request.label,
            images = request.image_count(),
            "Processing image analysis request"
        );

        let result = self.provider.analyze_image(request).await;
        let elapsed = Timestamp::now().duration_since(started_at);

        match &result {
            Ok(response) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    request_id = %request.request_id,
                    response_id = %response.response_id,
                    elapsed_ms = elapsed.as_millis(),
                    "Image analysis successful"
                );
            }
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    request_id = %request.request_id,
                    error = %error,
                    elapsed_ms = elapsed.as_millis(),
                    "Image analysis failed"
                );
            }
        }

        result
    }

    /// Transcribes audio, tracing the outcome.
    pub async fn transcribe_audio(&self, request: &AudioRequest) -> Result<AudioResponse> {
        let started_at = Timestamp::now();
        tracing::debug!(
            target: TRACING_TARGET,
            request_id = %request.request_id,
            label = %request.label,
            audio_bytes = request.size(),
            "Processing audio transcription request"
        );

        let result = self.provider.transcribe_audio(request).await;
        let elapsed = Timestamp::now().duration_since(started_at);

        match &result {
            Ok(response) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    request_id = %request.request_id,
                    response_id = %response.response_id,
                    elapsed_ms = elapsed.as_millis(),
                    "Audio transcription successful"
                );
            }
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    request_id = %request.request_id,
                    error = %error,
                    elapsed_ms = elapsed.as_millis(),
                    "Audio transcription failed"
                );
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::super::MockProvider;
    use super::*;

    #[tokio::test]
    async fn test_service_delegates_to_provider() {
        let service = InferenceService::from_provider(MockProvider::with_reply("Done."));
        let request = TextRequest::new("Summary", "Summarize.");

        let response = service.generate_text(&request).await.unwrap();

        assert_eq!(response.request_id, request.request_id);
        assert_eq!(response.content, "Done.");
    }

    #[tokio::test]
    async fn test_service_propagates_provider_errors() {
        let service = InferenceService::from_provider(MockProvider::with_fail_label("Summary"));
        let request = TextRequest::new("Summary", "Summarize.");

        let error = service.generate_text(&request).await.unwrap_err();

        assert!(error.is_provider_error());
    }
}
