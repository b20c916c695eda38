//! Request types accepted by inference providers.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use notra_core::Language;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::response::{AudioResponse, ImageResponse, TextResponse};

/// Request for text generation from a language model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextRequest {
    /// Unique identifier for this request.
    pub request_id: Uuid,
    /// Short label naming what is being generated.
    pub label: String,
    /// Guide describing how the content should be produced.
    pub prompt: String,
    /// Source material the generation is based on.
    pub input: String,
    /// Language the response should be written in.
    pub language: Language,
    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,
    /// Sampling temperature (0.0 to 1.0).
    pub temperature: Option<f32>,
}

impl TextRequest {
    /// Creates a new text request with the given label and prompt.
    pub fn new(label: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            request_id: Uuid::now_v7(),
            label: label.into(),
            prompt: prompt.into(),
            input: String::new(),
            language: Language::default(),
            max_tokens: None,
            temperature: Some(0.0),
        }
    }

    /// Sets the source material for the generation.
    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.input = input.into();
        self
    }

    /// Sets the response language.
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Sets the maximum number of tokens to generate.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Sets the sampling temperature, clamped to the valid range.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature.clamp(0.0, 1.0));
        self
    }

    /// System instruction combining the prompt with the language directive.
    pub fn system_instruction(&self) -> String {
        if self.prompt.is_empty() {
            format!("Please respond in {}.", self.language.display_name())
        } else {
            format!(
                "{}\n\nPlease respond in {}.",
                self.prompt,
                self.language.display_name()
            )
        }
    }

    /// User-facing content composed from the label and the input.
    pub fn user_content(&self) -> String {
        if self.input.is_empty() {
            self.label.clone()
        } else {
            format!("{}: {}", self.label, self.input)
        }
    }

    /// Creates a response for this request.
    pub fn reply(&self, content: impl Into<String>) -> TextResponse {
        TextResponse::new(self.request_id, content)
    }
}

/// An image handed to a vision model, as raw bytes plus a MIME type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageSource {
    /// Raw image bytes.
    pub data: Bytes,
    /// MIME type of the image, e.g. `image/png`.
    pub mime_type: String,
}

impl ImageSource {
    /// Creates an image source from raw bytes and a MIME type.
    pub fn new(data: impl Into<Bytes>, mime_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Creates a PNG image source from raw bytes.
    pub fn png(data: impl Into<Bytes>) -> Self {
        Self::new(data, "image/png")
    }

    /// Size of the image in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Base64-encodes the image bytes.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.data)
    }

    /// Renders the image as a `data:` URL suitable for vision APIs.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.to_base64())
    }
}

/// Request for image analysis by a vision model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRequest {
    /// Unique identifier for this request.
    pub request_id: Uuid,
    /// Short label naming what is being analyzed.
    pub label: String,
    /// Guide describing what to extract from the images.
    pub prompt: String,
    /// Images to analyze.
    pub images: Vec<ImageSource>,
    /// Language the response should be written in.
    pub language: Language,
    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,
}

impl ImageRequest {
    /// Creates a new image request with the given label and prompt.
    pub fn new(label: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            request_id: Uuid::now_v7(),
            label: label.into(),
            prompt: prompt.into(),
            images: Vec::new(),
            language: Language::default(),
            max_tokens: None,
        }
    }

    /// Appends an image to the request.
    pub fn add_image(mut self, image: ImageSource) -> Self {
        self.images.push(image);
        self
    }

    /// Replaces the images on the request.
    pub fn with_images(mut self, images: Vec<ImageSource>) -> Self {
        self.images = images;
        self
    }

    /// Sets the response language.
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Sets the maximum number of tokens to generate.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Whether the request carries at least one image.
    pub fn has_images(&self) -> bool {
        !self.images.is_empty()
    }

    /// Number of images on the request.
    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// Instruction combining the prompt with the language directive.
    pub fn instruction(&self) -> String {
        if self.prompt.is_empty() {
            format!("Please respond in {}.", self.language.display_name())
        } else {
            format!(
                "{}\n\nPlease respond in {}.",
                self.prompt,
                self.language.display_name()
            )
        }
    }

    /// Creates a response for this request.
    pub fn reply(&self, content: impl Into<String>) -> ImageResponse {
        ImageResponse::new(self.request_id, content)
    }
}

/// Request for audio transcription.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioRequest {
    /// Unique identifier for this request.
    pub request_id: Uuid,
    /// Short label naming the recording.
    pub label: String,
    /// Raw audio bytes.
    pub audio: Bytes,
    /// MIME type of the audio, e.g. `audio/mp3`.
    pub mime_type: String,
    /// Optional transcription prompt overriding the default.
    pub prompt: Option<String>,
    /// Primary language spoken in the recording.
    pub language: Language,
}

impl AudioRequest {
    /// Creates a new audio request with the given label and audio bytes.
    pub fn new(label: impl Into<String>, audio: impl Into<Bytes>) -> Self {
        Self {
            request_id: Uuid::now_v7(),
            label: label.into(),
            audio: audio.into(),
            mime_type: "audio/mp3".to_owned(),
            prompt: None,
            language: Language::default(),
        }
    }

    /// Sets the MIME type of the audio.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    /// Overrides the default transcription prompt.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    /// Sets the primary spoken language.
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Size of the audio in bytes.
    pub fn size(&self) -> usize {
        self.audio.len()
    }

    /// Base64-encodes the audio bytes.
    pub fn audio_base64(&self) -> String {
        STANDARD.encode(&self.audio)
    }

    /// Prompt steering the transcription model.
    pub fn transcription_prompt(&self) -> String {
        self.prompt.clone().unwrap_or_else(|| {
            format!(
                "The audio will mainly be in {}, however, they sometimes use \
                 terminology from other languages, you should transcribe the \
                 text in multiple languages accordingly.",
                self.language.display_name()
            )
        })
    }

    /// File extension derived from the MIME type.
    pub fn file_extension(&self) -> &str {
        self.mime_type.strip_prefix("audio/").unwrap_or("mp3")
    }

    /// File name presented to upload-style transcription APIs.
    pub fn file_name(&self) -> String {
        format!("audio.{}", self.file_extension())
    }

    /// Creates a response for this request.
    pub fn reply(&self, transcript: impl Into<String>) -> AudioResponse {
        AudioResponse::new(self.request_id, transcript)
    }
}
