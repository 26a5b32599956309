//! Output rendering for the chat application.
//!
//! This module provides the renderer trait and a plain-text implementation.
//! The renderer is a pure view: it draws conversation output, informational
//! lines, and notices, and makes no decisions about state.

use crate::chat::{Message, Sender};

/// ANSI escape code for dim text (used for the loading placeholder).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for cyan text (used for informational lines).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for yellow text (used for notices).
const ANSI_YELLOW: &str = "\x1b[33m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// Trait for rendering chat output.
///
/// This abstraction allows for different rendering strategies:
/// - Plain text with ANSI styling
/// - Plain text without styling (for piping/redirecting)
/// - A capturing implementation for tests
pub trait Renderer: Send {
    /// Render one conversation message.
    fn message(&mut self, message: &Message);

    /// Render a note that a message carries an image.
    fn image_note(&mut self, uri: &str) {
        _ = uri;
    }

    /// Render an informational line.
    fn info(&mut self, text: &str);

    /// Render a non-blocking notice (the toast equivalent).
    fn notice(&mut self, text: &str);

    /// Render an error line.
    fn error(&mut self, text: &str);
}

/// A renderer that writes plain text to stdout/stderr.
pub struct PlainTextRenderer {
    use_color: bool,
}

impl PlainTextRenderer {
    /// Creates a renderer with ANSI color enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a renderer with color explicitly enabled or disabled.
    pub fn with_color(use_color: bool) -> Self {
        Self { use_color }
    }

    fn styled(&self, code: &str, text: &str) -> String {
        if self.use_color {
            format!("{code}{text}{ANSI_RESET}")
        } else {
            text.to_string()
        }
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PlainTextRenderer {
    fn message(&mut self, message: &Message) {
        match message.sender {
            Sender::User => println!("You: {}", message.text),
            Sender::Ai => println!("{}", message.text),
            Sender::Loading => println!("{}", self.styled(ANSI_DIM, "...")),
        }
        if let Some(uri) = &message.image_url {
            self.image_note(uri);
        }
    }

    fn image_note(&mut self, uri: &str) {
        // Data URIs are too long to print in full.
        let preview: String = uri.chars().take(48).collect();
        println!("{}", self.styled(ANSI_CYAN, &format!("[image: {preview}...]")));
    }

    fn info(&mut self, text: &str) {
        println!("{}", self.styled(ANSI_CYAN, text));
    }

    fn notice(&mut self, text: &str) {
        eprintln!("{}", self.styled(ANSI_YELLOW, text));
    }

    fn error(&mut self, text: &str) {
        eprintln!("{}", self.styled(ANSI_RED, &format!("Error: {text}")));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn styling_respects_color_flag() {
        let renderer = PlainTextRenderer::with_color(true);
        assert_eq!(renderer.styled(ANSI_RED, "x"), "\x1b[31mx\x1b[0m");

        let renderer = PlainTextRenderer::with_color(false);
        assert_eq!(renderer.styled(ANSI_RED, "x"), "x");
    }
}
