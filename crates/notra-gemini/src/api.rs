//! Wire types for the Gemini `generateContent` REST API.

use notra_core::{Error, Result};
use notra_service::{AudioRequest, ImageRequest, TextRequest};
use serde::{Deserialize, Serialize};

/// Request body for `models/{model}:generateContent`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest {
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    pub contents: Vec<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

/// A content entry made of ordered parts.
#[derive(Debug, Clone, Serialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            parts: vec![Part::Text { text: text.into() }],
        }
    }
}

/// One part of a content entry.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

/// Inline binary payload, base64-encoded.
#[derive(Debug, Clone, Serialize)]
pub struct InlineData {
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub data: String,
}

/// Sampling settings for a request.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(rename = "maxOutputTokens", skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

/// Builds a generation request for text generation.
pub fn text_request(request: &TextRequest) -> GenerateContentRequest {
    GenerateContentRequest {
        system_instruction: Some(Content::text(request.system_instruction())),
        contents: vec![Content::text(request.user_content())],
        generation_config: Some(GenerationConfig {
            temperature: request.temperature,
            max_output_tokens: request.max_tokens,
        }),
    }
}

/// Builds a generation request carrying the request's images.
///
/// Each image is preceded by a text part naming its position, so the
/// model can refer to images by number.
pub fn vision_request(request: &ImageRequest) -> GenerateContentRequest {
    let mut parts = vec![Part::Text {
        text: request.instruction(),
    }];
    for (index, image) in request.images.iter().enumerate() {
        parts.push(Part::Text {
            text: format!("Image {}", index + 1),
        });
        parts.push(Part::InlineData {
            inline_data: InlineData {
                mime_type: image.mime_type.clone(),
                data: image.to_base64(),
            },
        });
    }

    GenerateContentRequest {
        system_instruction: None,
        contents: vec![Content { parts }],
        generation_config: Some(GenerationConfig {
            temperature: Some(0.0),
            max_output_tokens: request.max_tokens,
        }),
    }
}

/// Builds a generation request that transcribes the request's audio.
pub fn transcription_request(request: &AudioRequest) -> GenerateContentRequest {
    GenerateContentRequest {
        system_instruction: None,
        contents: vec![Content {
            parts: vec![
                Part::Text {
                    text: request.transcription_prompt(),
                },
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: request.mime_type.clone(),
                        data: request.audio_base64(),
                    },
                },
            ],
        }],
        generation_config: None,
    }
}

/// Response body for `models/{model}:generateContent`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub model_version: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate's parts.
    pub fn text(&self) -> Result<String> {
        let candidate = self.candidates.first().ok_or_else(|| {
            Error::provider_invalid_response()
                .with_message("Gemini response contained no candidates")
        })?;
        let content = candidate.content.as_ref().ok_or_else(|| {
            Error::provider_invalid_response().with_message("Gemini candidate had no content")
        })?;

        let text: String = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        if text.is_empty() {
            return Err(
                Error::provider_invalid_response().with_message("Gemini candidate had no text")
            );
        }
        Ok(text)
    }
}
