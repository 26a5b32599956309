//! Model recommendation based on past message traffic.
//!
//! The ranking decision is delegated entirely to the generation backend via a
//! natural-language prompt; there is no local ranking algorithm. The backend
//! is asked to reply with a small JSON object which is parsed and validated
//! here.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::observability;
use crate::router::GenerationBackend;
use crate::types::{Model, Part};

/// A model recommendation produced by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// The recommended model identifier.
    #[serde(rename = "recommendedModel")]
    pub recommended_model: String,

    /// Confidence in the recommendation, in [0, 1].
    pub confidence: f64,
}

/// Asks the backend to recommend a model for the query, given per-model
/// message traffic.
pub async fn recommend_model<B: GenerationBackend>(
    backend: &B,
    query: &str,
    traffic: &BTreeMap<String, u64>,
) -> Result<Recommendation> {
    observability::RECOMMEND_REQUESTS.click();

    let preferences = serde_json::to_string(traffic)?;
    let prompt = format!(
        "Based on the user's query and past model preferences, recommend the most \
         suitable AI model.\n\n\
         User Query: {query}\n\
         Model Preferences: {preferences}\n\n\
         Consider the message traffic to recommend a suitable model and the confidence \
         interval for the recommendation. Confidence must be a number between 0 and 1.\n\n\
         Output format: {{\"recommendedModel\": \"model_name\", \"confidence\": 0.95}}"
    );

    let reply = backend
        .generate_text(&Model::default_chat(), Vec::new(), vec![Part::text(prompt)])
        .await?;

    parse_recommendation(&reply)
}

/// Extracts and validates the JSON recommendation from a model reply,
/// tolerating surrounding prose and markdown code fences.
fn parse_recommendation(reply: &str) -> Result<Recommendation> {
    let start = reply.find('{');
    let end = reply.rfind('}');
    let (Some(start), Some(end)) = (start, end) else {
        return Err(Error::serialization(
            "recommendation reply contained no JSON object",
            None,
        ));
    };
    if end < start {
        return Err(Error::serialization(
            "recommendation reply contained no JSON object",
            None,
        ));
    }

    let recommendation: Recommendation = serde_json::from_str(&reply[start..=end])?;
    if !(0.0..=1.0).contains(&recommendation.confidence) {
        return Err(Error::validation(
            "confidence must be between 0 and 1",
            Some("confidence".to_string()),
        ));
    }
    Ok(recommendation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::router::GeneratedImage;
    use crate::types::Content;
    use std::sync::Mutex;

    struct ScriptedBackend {
        reply: String,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedBackend {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl GenerationBackend for ScriptedBackend {
        async fn generate_text(
            &self,
            _model: &Model,
            _history: Vec<Content>,
            prompt: Vec<Part>,
        ) -> Result<String> {
            let text = prompt
                .first()
                .and_then(Part::as_text)
                .unwrap_or_default()
                .to_string();
            self.prompts.lock().unwrap().push(text);
            Ok(self.reply.clone())
        }

        async fn generate_image(&self, _model: &Model, _prompt: &str) -> Result<GeneratedImage> {
            Err(Error::unknown("not used"))
        }
    }

    #[tokio::test]
    async fn recommends_from_plain_json() {
        let backend =
            ScriptedBackend::new(r#"{"recommendedModel": "gemini-2.0-flash", "confidence": 0.9}"#);
        let traffic = BTreeMap::from([("gemini-2.0-flash".to_string(), 7u64)]);

        let recommendation = recommend_model(&backend, "write rust code", &traffic)
            .await
            .unwrap();
        assert_eq!(recommendation.recommended_model, "gemini-2.0-flash");
        assert_eq!(recommendation.confidence, 0.9);

        let prompts = backend.prompts.lock().unwrap();
        assert!(prompts[0].contains("User Query: write rust code"));
        assert!(prompts[0].contains(r#""gemini-2.0-flash":7"#));
    }

    #[tokio::test]
    async fn recommends_from_fenced_json() {
        let backend = ScriptedBackend::new(
            "Sure!\n```json\n{\"recommendedModel\": \"gemini-1.5-flash-latest\", \
             \"confidence\": 0.75}\n```\n",
        );
        let recommendation = recommend_model(&backend, "quick question", &BTreeMap::new())
            .await
            .unwrap();
        assert_eq!(recommendation.recommended_model, "gemini-1.5-flash-latest");
    }

    #[tokio::test]
    async fn rejects_out_of_range_confidence() {
        let backend =
            ScriptedBackend::new(r#"{"recommendedModel": "gemini-2.0-flash", "confidence": 1.5}"#);
        let err = recommend_model(&backend, "q", &BTreeMap::new())
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn rejects_non_json_reply() {
        let backend = ScriptedBackend::new("I would recommend flash.");
        let err = recommend_model(&backend, "q", &BTreeMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Serialization { .. }));
    }
}
