use serde::{Deserialize, Serialize};

use crate::types::Content;

/// One candidate completion in a generation response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// The generated content.
    pub content: Content,

    /// Why generation stopped, when the backend reports it.
    #[serde(rename = "finishReason", skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

impl Candidate {
    /// Creates a candidate wrapping the given content.
    pub fn new(content: Content) -> Self {
        Self {
            content,
            finish_reason: None,
        }
    }
}
