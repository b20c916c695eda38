//! Output language selection.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};

/// Language the generated content should be written in.
///
/// Serialized with its BCP 47 tag (`vi-VN`, `en-US`), which is also the
/// accepted wire value. Vietnamese is the default.
#[derive(
    Debug,
    Default,
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
pub enum Language {
    /// Vietnamese (`vi-VN`).
    #[default]
    #[serde(rename = "vi-VN")]
    #[strum(serialize = "vi-VN")]
    Vietnamese,
    /// English (`en-US`).
    #[serde(rename = "en-US")]
    #[strum(serialize = "en-US")]
    English,
}

impl Language {
    /// Returns the human-readable name used when composing prompts.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Vietnamese => "Vietnamese",
            Self::English => "English",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_vietnamese() {
        assert_eq!(Language::default(), Language::Vietnamese);
    }

    #[test]
    fn parses_language_tags() {
        assert_eq!("vi-VN".parse::<Language>(), Ok(Language::Vietnamese));
        assert_eq!("en-US".parse::<Language>(), Ok(Language::English));
        assert!("fr-FR".parse::<Language>().is_err());
    }

    #[test]
    fn displays_language_tag() {
        assert_eq!(Language::Vietnamese.to_string(), "vi-VN");
        assert_eq!(Language::English.as_ref(), "en-US");
    }

    #[test]
    fn display_names_are_readable() {
        assert_eq!(Language::Vietnamese.display_name(), "Vietnamese");
        assert_eq!(Language::English.display_name(), "English");
    }
}
