//! Wire types for the OpenAI REST API.

use notra_core::{Error, Result};
use notra_service::{ImageRequest, TextRequest};
use serde::{Deserialize, Serialize};

/// Request body for `/chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    pub messages: Vec<ChatMessage>,
}

/// A single chat message.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: MessageContent,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_owned(),
            content: MessageContent::Text(content.into()),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_owned(),
            content: MessageContent::Text(content.into()),
        }
    }

    pub fn user_parts(parts: Vec<ContentPart>) -> Self {
        Self {
            role: "user".to_owned(),
            content: MessageContent::Parts(parts),
        }
    }
}

/// Message content, either plain text or a list of parts.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

/// One part of a multimodal message.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

/// Image reference carried in a message part.
#[derive(Debug, Clone, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

/// Builds a chat completion request for text generation.
pub fn chat_request(model: &str, request: &TextRequest) -> ChatRequest {
    ChatRequest {
        model: model.to_owned(),
        temperature: request.temperature,
        max_tokens: request.max_tokens,
        messages: vec![
            ChatMessage::system(request.system_instruction()),
            ChatMessage::user(request.user_content()),
        ],
    }
}

/// Builds a chat completion request carrying the request's images.
///
/// Each image is preceded by a text part naming its position, so the
/// model can refer to images by number.
pub fn vision_request(model: &str, request: &ImageRequest) -> ChatRequest {
    let mut parts = vec![ContentPart::Text {
        text: request.instruction(),
    }];
    for (index, image) in request.images.iter().enumerate() {
        parts.push(ContentPart::Text {
            text: format!("Image {}", index + 1),
        });
        parts.push(ContentPart::ImageUrl {
            image_url: ImageUrl {
                url: image.to_data_url(),
            },
        });
    }

    ChatRequest {
        model: model.to_owned(),
        temperature: Some(0.0),
        max_tokens: request.max_tokens,
        messages: vec![ChatMessage::user_parts(parts)],
    }
}

/// Response body for `/chat/completions`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletion {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletion {
    /// Content of the first choice; empty content is returned as-is.
    pub fn message_content(&self) -> Result<String> {
        let choice = self.choices.first().ok_or_else(|| {
            Error::provider_invalid_response()
                .with_message("OpenAI response contained no choices")
        })?;
        Ok(choice.message.content.clone().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use notra_core::{ErrorKind, Language};
    use notra_service::ImageSource;

    use super::*;

    #[test]
    fn test_chat_request_shape() {
        let request = TextRequest::new("Summary", "Summarize the visit.")
            .with_input("Patient presented with a cough.")
            .with_language(Language::English);
        let payload = serde_json::to_value(chat_request("gpt-4o-mini", &request)).unwrap();

        assert_eq!(payload["model"], "gpt-4o-mini");
        assert_eq!(payload["temperature"], 0.0);
        assert!(payload.get("max_tokens").is_none());
        assert_eq!(payload["messages"][0]["role"], "system");
        assert_eq!(
            payload["messages"][0]["content"],
            "Summarize the visit.\n\nPlease respond in English."
        );
        assert_eq!(payload["messages"][1]["role"], "user");
        assert_eq!(
            payload["messages"][1]["content"],
            "Summary: Patient presented with a cough."
        );
    }

    #[test]
    fn test_vision_request_numbers_images() {
        let request = ImageRequest::new("Scan", "Describe the scan.")
            .add_image(ImageSource::png(vec![1, 2, 3]))
            .add_image(ImageSource::png(vec![4, 5, 6]));
        let payload = serde_json::to_value(vision_request("gpt-4.1", &request)).unwrap();

        let parts = payload["messages"][0]["content"].as_array().unwrap();
        assert_eq!(parts.len(), 5);
        assert_eq!(parts[0]["type"], "text");
        assert_eq!(parts[1]["text"], "Image 1");
        assert_eq!(parts[2]["type"], "image_url");
        assert!(
            parts[2]["image_url"]["url"]
                .as_str()
                .unwrap()
                .starts_with("data:image/png;base64,")
        );
        assert_eq!(parts[3]["text"], "Image 2");
    }

    #[test]
    fn test_message_content_parsing() {
        let completion: ChatCompletion = serde_json::from_str(
            r#"{"model":"gpt-4o-mini","choices":[{"message":{"role":"assistant","content":"Generated note."}}]}"#,
        )
        .unwrap();

        assert_eq!(completion.message_content().unwrap(), "Generated note.");
        assert_eq!(completion.model.as_deref(), Some("gpt-4o-mini"));
    }

    #[test]
    fn test_null_content_is_empty() {
        let completion: ChatCompletion = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#,
        )
        .unwrap();

        assert_eq!(completion.message_content().unwrap(), "");
    }

    #[test]
    fn test_missing_choices_is_invalid() {
        let completion: ChatCompletion = serde_json::from_str(r#"{"choices":[]}"#).unwrap();

        let error = completion.message_content().unwrap_err();
        assert_eq!(error.kind(), ErrorKind::ProviderInvalidResponse);
    }
}
