//! Response types returned by inference providers.

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Wall-clock interval covering a single provider call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timing {
    /// When the call started.
    pub started_at: Timestamp,
    /// When the call finished.
    pub ended_at: Timestamp,
}

impl Timing {
    /// Creates a timing from start and end timestamps.
    pub fn new(started_at: Timestamp, ended_at: Timestamp) -> Self {
        Self {
            started_at,
            ended_at,
        }
    }

    /// Duration of the interval.
    pub fn duration(&self) -> SignedDuration {
        self.ended_at.duration_since(self.started_at)
    }
}

/// Response to a text generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextResponse {
    /// Unique identifier for this response.
    pub response_id: Uuid,
    /// Identifier of the request this responds to.
    pub request_id: Uuid,
    /// Generated text.
    pub content: String,
    /// Model that produced the content, when reported.
    pub model: Option<String>,
    /// Timing information for the provider call.
    pub timing: Option<Timing>,
}

impl TextResponse {
    /// Creates a new text response.
    pub fn new(request_id: Uuid, content: impl Into<String>) -> Self {
        Self {
            response_id: Uuid::now_v7(),
            request_id,
            content: content.into(),
            model: None,
            timing: None,
        }
    }

    /// Records the model that produced the content.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Records call timing.
    pub fn with_timing(mut self, started_at: Timestamp, ended_at: Timestamp) -> Self {
        self.timing = Some(Timing::new(started_at, ended_at));
        self
    }

    /// Duration of the provider call, when recorded.
    pub fn processing_time(&self) -> Option<SignedDuration> {
        self.timing.map(|timing| timing.duration())
    }

    /// Length of the generated content in bytes.
    pub fn content_length(&self) -> usize {
        self.content.len()
    }

    /// Whether the provider returned empty content.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Response to an image analysis request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageResponse {
    /// Unique identifier for this response.
    pub response_id: Uuid,
    /// Identifier of the request this responds to.
    pub request_id: Uuid,
    /// Analysis of the images.
    pub content: String,
    /// Model that produced the content, when reported.
    pub model: Option<String>,
    /// Timing information for the provider call.
    pub timing: Option<Timing>,
}

impl ImageResponse {
    /// Creates a new image response.
    pub fn new(request_id: Uuid, content: impl Into<String>) -> Self {
        Self {
            response_id: Uuid::now_v7(),
            request_id,
            content: content.into(),
            model: None,
            timing: None,
        }
    }

    /// Records the model that produced the content.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Records call timing.
    pub fn with_timing(mut self, started_at: Timestamp, ended_at: Timestamp) -> Self {
        self.timing = Some(Timing::new(started_at, ended_at));
        self
    }

    /// Duration of the provider call, when recorded.
    pub fn processing_time(&self) -> Option<SignedDuration> {
        self.timing.map(|timing| timing.duration())
    }

    /// Whether the provider returned empty content.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Response to an audio transcription request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioResponse {
    /// Unique identifier for this response.
    pub response_id: Uuid,
    /// Identifier of the request this responds to.
    pub request_id: Uuid,
    /// Transcript of the audio.
    pub transcript: String,
    /// Model that produced the transcript, when reported.
    pub model: Option<String>,
    /// Timing information for the provider call.
    pub timing: Option<Timing>,
}

impl AudioResponse {
    /// Creates a new audio response.
    pub fn new(request_id: Uuid, transcript: impl Into<String>) -> Self {
        Self {
            response_id: Uuid::now_v7(),
            request_id,
            transcript: transcript.into(),
            model: None,
            timing: None,
        }
    }

    /// Records the model that produced the transcript.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Records call timing.
    pub fn with_timing(mut self, started_at: Timestamp, ended_at: Timestamp) -> Self {
        self.timing = Some(Timing::new(started_at, ended_at));
        self
    }

    /// Duration of the provider call, when recorded.
    pub fn processing_time(&self) -> Option<SignedDuration> {
        self.timing.map(|timing| timing.duration())
    }

    /// Whether the transcription came back empty.
    pub fn is_empty(&self) -> bool {
        self.transcript.is_empty()
    }
}
