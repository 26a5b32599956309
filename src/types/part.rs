use serde::{Deserialize, Serialize};

/// Inline binary data carried in a request or response part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blob {
    /// The IANA media type of the data (e.g. "image/png").
    #[serde(rename = "mimeType")]
    pub mime_type: String,

    /// Base64-encoded bytes.
    pub data: String,
}

impl Blob {
    /// Creates a new blob from base64-encoded data.
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }
}

/// One part of a turn's content: text or inline data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    /// A plain text part.
    Text {
        /// The text content.
        text: String,
    },

    /// An inline data part (images attached by the user or generated by
    /// the model).
    InlineData {
        /// The inline data payload.
        #[serde(rename = "inlineData")]
        inline_data: Blob,
    },
}

impl Part {
    /// Creates a text part.
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    /// Creates an inline-data part.
    pub fn inline_data(blob: Blob) -> Self {
        Part::InlineData { inline_data: blob }
    }

    /// The text of this part, if it is a text part.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Part::Text { text } => Some(text),
            Part::InlineData { .. } => None,
        }
    }

    /// The blob of this part, if it is an inline-data part.
    pub fn as_inline_data(&self) -> Option<&Blob> {
        match self {
            Part::Text { .. } => None,
            Part::InlineData { inline_data } => Some(inline_data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, to_value};

    #[test]
    fn text_part_serialization() {
        let part = Part::text("Hello");
        assert_eq!(to_value(&part).unwrap(), json!({"text": "Hello"}));
    }

    #[test]
    fn inline_data_part_serialization() {
        let part = Part::inline_data(Blob::new("image/png", "aGVsbG8="));
        assert_eq!(
            to_value(&part).unwrap(),
            json!({
                "inlineData": {
                    "mimeType": "image/png",
                    "data": "aGVsbG8="
                }
            })
        );
    }

    #[test]
    fn part_deserialization() {
        let part: Part = serde_json::from_value(json!({"text": "hi"})).unwrap();
        assert_eq!(part.as_text(), Some("hi"));

        let part: Part = serde_json::from_value(json!({
            "inlineData": {"mimeType": "image/jpeg", "data": "Zm9v"}
        }))
        .unwrap();
        assert_eq!(part.as_inline_data().unwrap().mime_type, "image/jpeg");
    }
}
