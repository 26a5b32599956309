use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Represents a Gemini model identifier.
///
/// This can be a predefined model version or a custom string value
/// for models that may be added in the future.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Model {
    /// Known model versions
    Known(KnownModel),

    /// Custom model identifier (for future models or private models)
    Custom(String),
}

/// Known Gemini model versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KnownModel {
    /// Gemini 1.5 Flash (latest version)
    #[serde(rename = "gemini-1.5-flash-latest")]
    Gemini15FlashLatest,

    /// Gemini 1.5 Flash (pinned version)
    #[serde(rename = "gemini-1.5-flash")]
    Gemini15Flash,

    /// Gemini 1.5 Pro (latest version)
    #[serde(rename = "gemini-1.5-pro-latest")]
    Gemini15ProLatest,

    /// Gemini 1.5 Pro (pinned version)
    #[serde(rename = "gemini-1.5-pro")]
    Gemini15Pro,

    /// Gemini 2.0 Flash
    #[serde(rename = "gemini-2.0-flash")]
    Gemini20Flash,

    /// Gemini 2.0 Flash preview with image generation output
    #[serde(rename = "gemini-2.0-flash-preview-image-generation")]
    Gemini20FlashPreviewImageGeneration,
}

impl Model {
    /// The model used when no selection has been made.
    pub fn default_chat() -> Self {
        Model::Known(KnownModel::Gemini15FlashLatest)
    }

    /// The fixed image-capable variant used for image-generation requests.
    pub fn image_generation() -> Self {
        Model::Known(KnownModel::Gemini20FlashPreviewImageGeneration)
    }

    /// The model identifier as sent on the wire.
    pub fn id(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Model::Known(known_model) => write!(f, "{}", known_model),
            Model::Custom(custom) => write!(f, "{}", custom),
        }
    }
}

impl fmt::Display for KnownModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KnownModel::Gemini15FlashLatest => write!(f, "gemini-1.5-flash-latest"),
            KnownModel::Gemini15Flash => write!(f, "gemini-1.5-flash"),
            KnownModel::Gemini15ProLatest => write!(f, "gemini-1.5-pro-latest"),
            KnownModel::Gemini15Pro => write!(f, "gemini-1.5-pro"),
            KnownModel::Gemini20Flash => write!(f, "gemini-2.0-flash"),
            KnownModel::Gemini20FlashPreviewImageGeneration => {
                write!(f, "gemini-2.0-flash-preview-image-generation")
            }
        }
    }
}

impl FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let known = match s {
            "gemini-1.5-flash-latest" => Some(KnownModel::Gemini15FlashLatest),
            "gemini-1.5-flash" => Some(KnownModel::Gemini15Flash),
            "gemini-1.5-pro-latest" => Some(KnownModel::Gemini15ProLatest),
            "gemini-1.5-pro" => Some(KnownModel::Gemini15Pro),
            "gemini-2.0-flash" => Some(KnownModel::Gemini20Flash),
            "gemini-2.0-flash-preview-image-generation" => {
                Some(KnownModel::Gemini20FlashPreviewImageGeneration)
            }
            _ => None,
        };
        Ok(match known {
            Some(known) => Model::Known(known),
            None => Model::Custom(s.to_string()),
        })
    }
}

impl From<KnownModel> for Model {
    fn from(model: KnownModel) -> Self {
        Model::Known(model)
    }
}

impl From<String> for Model {
    fn from(model: String) -> Self {
        model.parse().unwrap_or(Model::Custom(model))
    }
}

impl From<&str> for Model {
    fn from(model: &str) -> Self {
        model.parse().unwrap_or_else(|_| Model::Custom(model.to_string()))
    }
}
