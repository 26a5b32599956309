use serde::{Deserialize, Serialize};

use crate::types::{Blob, Candidate, Part};

/// Response from a `generateContent` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateContentResponse {
    /// Candidate completions; the first candidate is the reply.
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, if any text was produced.
    pub fn text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        let text = candidate.content.text();
        if text.is_empty() { None } else { Some(text) }
    }

    /// The first inline-data part of the first candidate, if present.
    ///
    /// Image-generation responses deliver the image this way.
    pub fn inline_data(&self) -> Option<&Blob> {
        self.candidates
            .first()?
            .content
            .parts
            .iter()
            .find_map(Part::as_inline_data)
    }
}
