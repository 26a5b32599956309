//! Request routing between the text-chat and image-generation backends.
//!
//! Every submitted utterance is classified exactly once into an [`Intent`],
//! and the matching backend is invoked. There is no fallback between the two
//! paths: an image-generation failure never degrades to a text chat.
//!
//! Backend API errors are converted into fixed, user-visible reply text here;
//! only transport-level failures propagate to the caller.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::client::Gemini;
use crate::error::{Error, Result};
use crate::observability;
use crate::types::{
    Content, DataUri, GenerateContentRequest, GenerationConfig, Model, Part,
};

/// Pattern for utterances that request an image, anchored at the start:
/// "generate/create/make/draw [an] image/picture/photo/drawing of ...".
static IMAGE_INTENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(generate|create|make|draw)\s+(an\s+)?(image|picture|photo|drawing)\s+of")
        .expect("image intent pattern is valid")
});

/// Fixed reply for a successful image generation.
const IMAGE_SUCCESS_TEXT: &str = "Here's the image you requested.";

/// Fixed reply when image generation fails because of the API key.
const IMAGE_API_KEY_TEXT: &str =
    "It seems the API key for image generation is missing or invalid. Please check your .env file.";

/// Fixed reply when image generation fails for any other reason.
const IMAGE_FAILURE_TEXT: &str = "Sorry, I was unable to generate the image.";

/// Fixed reply when a chat request fails for an unclassified reason.
const CHAT_FAILURE_TEXT: &str = "An unexpected error occurred. Please check the server logs.";

/// What a submitted utterance is asking for. Decided once per call.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Intent {
    /// A normal chat turn.
    TextChat,

    /// A request to generate an image.
    ImageGeneration,
}

impl Intent {
    /// Classifies an utterance.
    pub fn classify(utterance: &str) -> Self {
        if IMAGE_INTENT.is_match(utterance) {
            Intent::ImageGeneration
        } else {
            Intent::TextChat
        }
    }
}

/// An image produced by the generation backend.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedImage {
    /// The image content as a data URI.
    pub uri: DataUri,
}

/// The generation backends the router dispatches to.
///
/// This is the seam between routing policy and the HTTP client; tests
/// substitute their own implementation.
#[async_trait::async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generates a text reply from prior history plus the current prompt
    /// parts.
    async fn generate_text(
        &self,
        model: &Model,
        history: Vec<Content>,
        prompt: Vec<Part>,
    ) -> Result<String>;

    /// Generates an image from a single text prompt.
    async fn generate_image(&self, model: &Model, prompt: &str) -> Result<GeneratedImage>;
}

#[async_trait::async_trait]
impl GenerationBackend for Gemini {
    async fn generate_text(
        &self,
        model: &Model,
        history: Vec<Content>,
        prompt: Vec<Part>,
    ) -> Result<String> {
        let request = GenerateContentRequest::new(history, prompt);
        let response = self.generate(model, request).await?;
        response
            .text()
            .ok_or_else(|| Error::unknown("response contained no text"))
    }

    async fn generate_image(&self, model: &Model, prompt: &str) -> Result<GeneratedImage> {
        let request = GenerateContentRequest::from_prompt(prompt)
            .with_generation_config(GenerationConfig::text_and_image());
        let response = self.generate(model, request).await?;
        let blob = response
            .inline_data()
            .ok_or_else(|| Error::unknown("response contained no image"))?;
        Ok(GeneratedImage {
            uri: DataUri::from_blob(blob),
        })
    }
}

/// The reply produced by one routed request.
#[derive(Debug, Clone, PartialEq)]
pub struct RouterReply {
    /// The reply text.
    pub text: String,

    /// The generated image, when the image path produced one.
    pub image_url: Option<String>,
}

/// Dispatches utterances to the matching generation backend.
pub struct Router<B> {
    backend: B,
}

impl<B: GenerationBackend> Router<B> {
    /// Creates a router over the given backend.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// The underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Routes one utterance.
    ///
    /// Image intents call the image backend with the raw utterance as the
    /// prompt and a fixed image-capable model. Text intents call the text
    /// backend with the mapped history and the utterance (plus the optional
    /// attached image) as the prompt.
    ///
    /// Backend API errors become fixed reply text; transport errors are
    /// returned as `Err` for the orchestrator to handle.
    pub async fn route(
        &self,
        utterance: &str,
        history: Vec<Content>,
        model: &Model,
        image: Option<&DataUri>,
    ) -> Result<RouterReply> {
        match Intent::classify(utterance) {
            Intent::ImageGeneration => {
                observability::ROUTER_IMAGE_REQUESTS.click();
                match self
                    .backend
                    .generate_image(&Model::image_generation(), utterance)
                    .await
                {
                    Ok(image) => Ok(RouterReply {
                        text: IMAGE_SUCCESS_TEXT.to_string(),
                        image_url: Some(image.uri.to_string()),
                    }),
                    Err(err) if err.is_transport() => Err(err),
                    Err(err) => Ok(RouterReply {
                        text: image_failure_text(&err).to_string(),
                        image_url: None,
                    }),
                }
            }
            Intent::TextChat => {
                observability::ROUTER_TEXT_REQUESTS.click();
                let mut prompt = vec![Part::text(utterance)];
                if let Some(image) = image {
                    prompt.push(Part::inline_data(image.to_blob()));
                }
                match self.backend.generate_text(model, history, prompt).await {
                    Ok(text) => Ok(RouterReply {
                        text,
                        image_url: None,
                    }),
                    Err(err) if err.is_transport() => Err(err),
                    Err(err) => Ok(RouterReply {
                        text: chat_failure_text(model, &err),
                        image_url: None,
                    }),
                }
            }
        }
    }
}

/// True when the error is an API-key problem: typed kind first, message
/// substring as the fallback for backends without structured errors.
fn mentions_api_key(err: &Error) -> bool {
    err.is_authentication() || err.to_string().contains("API key")
}

/// True when the error means the model is unavailable to this caller.
fn model_unavailable(err: &Error) -> bool {
    if err.is_not_found() || err.is_permission() {
        return true;
    }
    let text = err.to_string();
    text.contains("404") || text.contains("permission")
}

fn image_failure_text(err: &Error) -> &'static str {
    if mentions_api_key(err) {
        IMAGE_API_KEY_TEXT
    } else {
        IMAGE_FAILURE_TEXT
    }
}

fn chat_failure_text(model: &Model, err: &Error) -> String {
    let mut text = CHAT_FAILURE_TEXT.to_string();
    if mentions_api_key(err) {
        text = format!(
            "It seems the API key for {model} is missing or invalid. Please check your .env file."
        );
    }
    if model_unavailable(err) {
        text = format!(
            "The model \"{model}\" was not found or you may not have permission to use it. \
             Please check the model name and your API key permissions."
        );
    }
    text
}
