// Public modules
pub mod chat;
pub mod client;
pub mod error;
pub mod recommend;
pub mod render;
pub mod router;
pub mod types;

mod observability;

// Re-exports
pub use client::Gemini;
pub use error::{Error, Result};
pub use observability::register_biometrics;
pub use recommend::{Recommendation, recommend_model};
pub use render::{PlainTextRenderer, Renderer};
pub use router::{GeneratedImage, GenerationBackend, Intent, Router, RouterReply};
pub use types::*;
