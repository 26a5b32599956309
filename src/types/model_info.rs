use serde::{Deserialize, Serialize};

/// A static catalog entry describing a selectable chat model.
///
/// Catalog entries are read-only reference data: the id is the wire
/// identifier, the name and description are for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// The wire identifier for the model.
    pub id: String,

    /// Human-readable display name.
    pub name: String,

    /// Short description shown alongside the name.
    pub description: String,
}

impl ModelInfo {
    /// Creates a new catalog entry.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Returns the static model catalog, ordered with the default model first.
pub fn catalog() -> Vec<ModelInfo> {
    vec![
        ModelInfo::new(
            "gemini-1.5-flash-latest",
            "Gemini 1.5 Flash",
            "Google's fast and efficient model.",
        ),
        ModelInfo::new(
            "gemini-2.0-flash",
            "Gemini 2.0 Flash",
            "Newer generation with stronger reasoning.",
        ),
    ]
}

/// Looks up a catalog entry by its wire identifier.
pub fn catalog_entry(id: &str) -> Option<ModelInfo> {
    catalog().into_iter().find(|m| m.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_default_first() {
        let models = catalog();
        assert!(!models.is_empty());
        assert_eq!(models[0].id, "gemini-1.5-flash-latest");
    }

    #[test]
    fn lookup_by_id() {
        assert!(catalog_entry("gemini-2.0-flash").is_some());
        assert!(catalog_entry("no-such-model").is_none());
    }

    #[test]
    fn serialization() {
        let info = ModelInfo::new("m1", "Model One", "A model.");
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "m1",
                "name": "Model One",
                "description": "A model."
            })
        );
    }
}
