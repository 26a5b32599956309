use serde::{Deserialize, Serialize};

/// Response modalities a generation request may ask for.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Modality {
    /// Text output.
    Text,

    /// Image output.
    Image,
}

/// Optional generation parameters attached to a request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// The modalities requested for the response. Image generation requires
    /// requesting both text and image.
    #[serde(
        rename = "responseModalities",
        skip_serializing_if = "Option::is_none"
    )]
    pub response_modalities: Option<Vec<Modality>>,
}

impl GenerationConfig {
    /// Config requesting combined text and image output.
    pub fn text_and_image() -> Self {
        Self {
            response_modalities: Some(vec![Modality::Text, Modality::Image]),
        }
    }
}
