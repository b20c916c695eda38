//! Inference provider abstraction.
//!
//! This module defines the types used to communicate with AI model
//! providers:
//!
//! - [`TextRequest`] / [`TextResponse`] for text generation
//! - [`ImageRequest`] / [`ImageResponse`] for image analysis
//! - [`AudioRequest`] / [`AudioResponse`] for audio transcription
//! - [`InferenceProvider`] trait implemented by vendor adapters
//! - [`InferenceService`] wrapper adding tracing around provider calls
//!
//! # Example
//!
//! ```ignore
//! use notra_service::inference::{InferenceService, TextRequest};
//!
//! let service = InferenceService::from_provider(provider);
//! let response = service.generate_text(&TextRequest::new("Summary", "Summarize the visit.")).await?;
//! ```

#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
mod mock;
pub mod request;
pub mod response;
mod service;

#[cfg(any(test, feature = "test-utils"))]
pub use mock::{MockConfig, MockProvider};
pub use notra_core::{Error, Result};
pub use request::{AudioRequest, ImageRequest, ImageSource, TextRequest};
pub use response::{AudioResponse, ImageResponse, TextResponse, Timing};
pub use service::InferenceService;

/// Target for tracing events in this module.
pub const TRACING_TARGET: &str = "notra_service::inference";

/// Abstraction over AI model providers.
///
/// Implementations call a single vendor and translate its wire format
/// into the crate's request and response types. Adapters perform no
/// retries; callers own retry and timeout policy.
#[async_trait::async_trait]
pub trait InferenceProvider: Send + Sync {
    /// Generates text from a prompt and optional source material.
    async fn generate_text(&self, request: &TextRequest) -> Result<TextResponse>;

    /// Analyzes one or more images guided by a prompt.
    async fn analyze_image(&self, request: &ImageRequest) -> Result<ImageResponse>;

    /// Transcribes audio to text.
    async fn transcribe_audio(&self, request: &AudioRequest) -> Result<AudioResponse>;
}
