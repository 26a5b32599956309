//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg` and configuration
//! structures for controlling chat behavior.

use std::path::PathBuf;

use arrrg_derive::CommandLine;

/// Command-line arguments for the nebula-chat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Model to select at startup.
    #[arrrg(optional, "Model to select (default: gemini-1.5-flash-latest)", "MODEL")]
    pub model: Option<String>,

    /// Path to the conversation store file.
    #[arrrg(optional, "Conversation store path (default: user data dir)", "FILE")]
    pub store: Option<String>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// Configuration for a chat session.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments with appropriate defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// Model id to select at startup, when provided.
    pub model: Option<String>,

    /// Where the conversation store lives.
    pub store_path: PathBuf,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    pub fn new() -> Self {
        Self {
            model: None,
            store_path: default_store_path(),
            use_color: true,
        }
    }

    /// Sets the startup model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the conversation store path.
    pub fn with_store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_path = path.into();
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ChatArgs> for ChatConfig {
    fn from(args: ChatArgs) -> Self {
        ChatConfig {
            model: args.model,
            store_path: args.store.map(PathBuf::from).unwrap_or_else(default_store_path),
            use_color: !args.no_color,
        }
    }
}

/// The default location of the conversation store: the platform data dir,
/// falling back to the working directory.
fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("nebula")
        .join("conversations.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ChatConfig::new();
        assert!(config.model.is_none());
        assert!(config.use_color);
        assert!(config.store_path.ends_with("nebula/conversations.json"));
    }

    #[test]
    fn config_from_args_defaults() {
        let args = ChatArgs::default();
        let config = ChatConfig::from(args);
        assert!(config.model.is_none());
        assert!(config.use_color);
    }

    #[test]
    fn config_from_args_custom() {
        let args = ChatArgs {
            model: Some("gemini-2.0-flash".to_string()),
            store: Some("/tmp/convos.json".to_string()),
            no_color: true,
        };
        let config = ChatConfig::from(args);
        assert_eq!(config.model.as_deref(), Some("gemini-2.0-flash"));
        assert_eq!(config.store_path, PathBuf::from("/tmp/convos.json"));
        assert!(!config.use_color);
    }

    #[test]
    fn config_builder_pattern() {
        let config = ChatConfig::new()
            .with_model("gemini-2.0-flash")
            .with_store_path("/tmp/c.json")
            .without_color();

        assert_eq!(config.model.as_deref(), Some("gemini-2.0-flash"));
        assert_eq!(config.store_path, PathBuf::from("/tmp/c.json"));
        assert!(!config.use_color);
    }
}
