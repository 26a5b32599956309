// Public modules
pub mod candidate;
pub mod content;
pub mod data_uri;
pub mod generate_content_request;
pub mod generate_content_response;
pub mod generation_config;
pub mod model;
pub mod model_info;
pub mod part;

// Re-exports
pub use candidate::Candidate;
pub use content::{Content, Role};
pub use data_uri::DataUri;
pub use generate_content_request::GenerateContentRequest;
pub use generate_content_response::GenerateContentResponse;
pub use generation_config::{GenerationConfig, Modality};
pub use model::{KnownModel, Model};
pub use model_info::{ModelInfo, catalog, catalog_entry};
pub use part::{Blob, Part};
