//! Wire types for the Anthropic Messages API.

use notra_core::{Error, Result};
use notra_service::{ImageRequest, TextRequest};
use serde::{Deserialize, Serialize};

/// API version sent with every request.
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Request body for `/v1/messages`.
#[derive(Debug, Clone, Serialize)]
pub struct MessagesRequest {
    pub model: String,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub messages: Vec<Message>,
}

/// A single message in the conversation.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub role: String,
    pub content: MessageContent,
}

/// Message content, either plain text or a list of blocks.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

/// One block of a multimodal message.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text { text: String },
    Image { source: ImageBlockSource },
}

/// Base64 image payload carried in a content block.
#[derive(Debug, Clone, Serialize)]
pub struct ImageBlockSource {
    #[serde(rename = "type")]
    pub kind: String,
    pub media_type: String,
    pub data: String,
}

impl ImageBlockSource {
    pub fn base64(media_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            kind: "base64".to_owned(),
            media_type: media_type.into(),
            data: data.into(),
        }
    }
}

/// Builds a messages request for text generation.
pub fn text_request(model: &str, max_tokens: u32, request: &TextRequest) -> MessagesRequest {
    MessagesRequest {
        model: model.to_owned(),
        max_tokens: request.max_tokens.unwrap_or(max_tokens),
        temperature: request.temperature,
        system: Some(request.system_instruction()),
        messages: vec![Message {
            role: "user".to_owned(),
            content: MessageContent::Text(request.user_content()),
        }],
    }
}

/// Builds a messages request carrying the request's images.
///
/// Each image is preceded by a text block naming its position, so the
/// model can refer to images by number.
pub fn vision_request(model: &str, max_tokens: u32, request: &ImageRequest) -> MessagesRequest {
    let mut blocks = vec![ContentBlock::Text {
        text: request.instruction(),
    }];
    for (index, image) in request.images.iter().enumerate() {
        blocks.push(ContentBlock::Text {
            text: format!("Image {}", index + 1),
        });
        blocks.push(ContentBlock::Image {
            source: ImageBlockSource::base64(image.mime_type.clone(), image.to_base64()),
        });
    }

    MessagesRequest {
        model: model.to_owned(),
        max_tokens: request.max_tokens.unwrap_or(max_tokens),
        temperature: Some(0.0),
        system: None,
        messages: vec![Message {
            role: "user".to_owned(),
            content: MessageContent::Blocks(blocks),
        }],
    }
}

/// Response body for `/v1/messages`.
#[derive(Debug, Clone, Deserialize)]
pub struct MessagesResponse {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub content: Vec<ResponseBlock>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseBlock {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: Option<String>,
}

impl MessagesResponse {
    /// Text of the first text block in the response.
    pub fn text(&self) -> Result<String> {
        self.content
            .iter()
            .find(|block| block.kind == "text")
            .and_then(|block| block.text.clone())
            .ok_or_else(|| {
                Error::provider_invalid_response()
                    .with_message("Anthropic response contained no text content")
            })
    }
}
