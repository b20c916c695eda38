//! Mock provider for testing without network access.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use notra_core::{Error, Result};
use serde::{Deserialize, Serialize};

#[cfg(feature = "config")]
use clap::Args;

use super::{
    AudioRequest, AudioResponse, ImageRequest, ImageResponse, InferenceProvider, InferenceService,
    TextRequest, TextResponse,
};

/// Configuration for the mock provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct MockConfig {
    /// Fixed reply returned for every request.
    #[cfg_attr(feature = "config", arg(long = "mock-reply", env = "MOCK_REPLY"))]
    #[serde(default)]
    pub reply: Option<String>,

    /// Prefix prepended to the request label to form the reply.
    #[cfg_attr(
        feature = "config",
        arg(long = "mock-reply-prefix", env = "MOCK_REPLY_PREFIX")
    )]
    #[serde(default)]
    pub reply_prefix: Option<String>,

    /// Labels whose requests fail with a provider error.
    #[cfg_attr(feature = "config", arg(long = "mock-fail-label"))]
    #[serde(default)]
    pub fail_labels: Vec<String>,

    /// Artificial delay applied before responding, in milliseconds.
    #[cfg_attr(feature = "config", arg(long = "mock-delay-ms", env = "MOCK_DELAY_MS"))]
    #[serde(default)]
    pub delay_ms: Option<u64>,

    /// Labels the delay applies to; empty means all labels.
    #[cfg_attr(feature = "config", arg(long = "mock-slow-label"))]
    #[serde(default)]
    pub slow_labels: Vec<String>,
}

/// In-process provider returning canned responses.
///
/// Clones share their call counters, so a test can keep one handle and
/// hand a clone to the service under test.
#[derive(Debug, Clone, Default)]
pub struct MockProvider {
    config: Arc<MockConfig>,
    calls: Arc<AtomicUsize>,
    active: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

impl MockProvider {
    /// Creates a mock provider with the given configuration.
    pub fn new(config: MockConfig) -> Self {
        Self {
            config: Arc::new(config),
            calls: Arc::new(AtomicUsize::new(0)),
            active: Arc::new(AtomicUsize::new(0)),
            peak: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Creates a mock provider returning a fixed reply.
    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self::new(MockConfig {
            reply: Some(reply.into()),
            ..MockConfig::default()
        })
    }

    /// Creates a mock provider replying with `prefix + label`.
    pub fn with_reply_prefix(prefix: impl Into<String>) -> Self {
        Self::new(MockConfig {
            reply_prefix: Some(prefix.into()),
            ..MockConfig::default()
        })
    }

    /// Creates a mock provider that fails requests with the given label.
    pub fn with_fail_label(label: impl Into<String>) -> Self {
        Self::new(MockConfig {
            fail_labels: vec![label.into()],
            ..MockConfig::default()
        })
    }

    /// Creates a mock provider that sleeps before every response.
    pub fn with_delay_ms(delay_ms: u64) -> Self {
        Self::new(MockConfig {
            delay_ms: Some(delay_ms),
            ..MockConfig::default()
        })
    }

    /// Wraps this provider in an [`InferenceService`].
    pub fn into_service(self) -> InferenceService {
        InferenceService::from_provider(self)
    }

    /// Total number of provider calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of calls observed in flight at once.
    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    fn begin_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(active, Ordering::SeqCst);
    }

    fn end_call(&self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }

    async fn respond(&self, label: &str) -> Result<String> {
        let slow = self.config.slow_labels.is_empty()
            || self.config.slow_labels.iter().any(|slow| slow == label);
        if let Some(delay_ms) = self.config.delay_ms
            && slow
        {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }

        if self.config.fail_labels.iter().any(|fail| fail == label) {
            return Err(Error::provider_unavailable()
                .with_message(format!("mock failure for label {label}")));
        }

        Ok(match (&self.config.reply, &self.config.reply_prefix) {
            (Some(reply), _) => reply.clone(),
            (None, Some(prefix)) => format!("{prefix}{label}"),
            (None, None) => format!("Mock response for {label}"),
        })
    }
}

#[async_trait::async_trait]
impl InferenceProvider for MockProvider {
    async fn generate_text(&self, request: &TextRequest) -> Result<TextResponse> {
        self.begin_call();
        let result = self.respond(&request.label).await;
        self.end_call();
        result.map(|content| request.reply(content))
    }

    async fn analyze_image(&self, request: &ImageRequest) -> Result<ImageResponse> {
        self.begin_call();
        let result = self.respond(&request.label).await;
        self.end_call();
        result.map(|content| request.reply(content))
    }

    async fn transcribe_audio(&self, request: &AudioRequest) -> Result<AudioResponse> {
        self.begin_call();
        let result = self.respond(&request.label).await;
        self.end_call();
        result.map(|transcript| request.reply(transcript))
    }
}

#[cfg(test)]
mod tests {
    use notra_core::ErrorKind;

    use super::*;

    #[tokio::test]
    async fn test_default_reply_includes_label() {
        let provider = MockProvider::default();
        let request = TextRequest::new("Summary", "Summarize.");

        let response = provider.generate_text(&request).await.unwrap();

        assert_eq!(response.content, "Mock response for Summary");
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_reply_prefix_appends_label() {
        let provider = MockProvider::with_reply_prefix("V");
        let request = TextRequest::new("L1", "Guide.");

        let response = provider.generate_text(&request).await.unwrap();

        assert_eq!(response.content, "VL1");
    }

    #[tokio::test]
    async fn test_fail_label_produces_provider_error() {
        let provider = MockProvider::with_fail_label("Summary");

        let good = TextRequest::new("Plan", "Guide.");
        let bad = TextRequest::new("Summary", "Guide.");

        assert!(provider.generate_text(&good).await.is_ok());
        let error = provider.generate_text(&bad).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::ProviderUnavailable);
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_clones_share_counters() {
        let provider = MockProvider::default();
        let clone = provider.clone();

        let request = AudioRequest::new("Recording", vec![0u8; 4]);
        clone.transcribe_audio(&request).await.unwrap();

        assert_eq!(provider.call_count(), 1);
    }
}
