use serde::{Deserialize, Serialize};

use crate::types::{Content, GenerationConfig, Part, Role};

/// Parameters for a `generateContent` call.
///
/// The `contents` sequence carries prior turns in order, ending with the
/// current user turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateContentRequest {
    /// Ordered conversation turns, current turn last.
    pub contents: Vec<Content>,

    /// Optional generation parameters.
    #[serde(
        rename = "generationConfig",
        skip_serializing_if = "Option::is_none"
    )]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    /// Creates a request from prior history plus the current turn's parts.
    pub fn new(mut history: Vec<Content>, prompt: Vec<Part>) -> Self {
        history.push(Content::new(Role::User, prompt));
        Self {
            contents: history,
            generation_config: None,
        }
    }

    /// Creates a single-turn request from one text prompt.
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self::new(Vec::new(), vec![Part::text(prompt)])
    }

    /// Attaches generation parameters to the request.
    pub fn with_generation_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = Some(config);
        self
    }
}
