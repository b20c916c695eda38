//! Provider capability selection.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};

/// The AI operation a provider call performs.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Capability {
    /// Text generation from a prompt and seed content.
    TextGeneration,
    /// Image analysis guided by a prompt.
    ImageAnalysis,
    /// Audio transcription.
    AudioTranscription,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_snake_case() {
        assert_eq!(Capability::TextGeneration.to_string(), "text_generation");
        assert_eq!(Capability::ImageAnalysis.as_ref(), "image_analysis");
        assert_eq!(
            Capability::AudioTranscription.to_string(),
            "audio_transcription"
        );
    }

    #[test]
    fn parses_snake_case() {
        assert_eq!(
            "text_generation".parse::<Capability>(),
            Ok(Capability::TextGeneration)
        );
        assert!("video_generation".parse::<Capability>().is_err());
    }
}
