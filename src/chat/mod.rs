//! Chat application module for interactive conversations.
//!
//! This module provides the conversation data model, the persistent store,
//! and the session orchestrator used by the nebula-chat REPL. It supports:
//!
//! - Conversations persisted locally across restarts
//! - Routed text and image-generation requests
//! - Per-message feedback and per-model traffic accounting
//! - Slash commands for session control
//!
//! # Architecture
//!
//! The module is organized into several components:
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`conversation`]: message and conversation entities
//! - [`store`]: persistence port and conversation CRUD
//! - [`session`]: request orchestration around the router
//! - [`commands`]: slash command parsing and handling

mod commands;
mod config;
mod conversation;
mod session;
mod store;

pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatConfig};
pub use conversation::{Conversation, Feedback, Message, Sender, now_millis};
pub use session::{ChatSession, SessionStats, TurnOutcome};
pub use store::{ConversationStore, FileStorage, MemoryStorage, StorageBackend, StoreState};
