//! Core chat session management.
//!
//! This module provides the `ChatSession` struct which orchestrates one
//! submitted utterance at a time: conversation bookkeeping, dispatch through
//! the router, and reconciliation of the reply (or failure) into the store.

use std::collections::BTreeMap;

use crate::chat::conversation::{Conversation, Feedback, Message};
use crate::chat::store::ConversationStore;
use crate::error::Result;
use crate::observability;
use crate::recommend::{Recommendation, recommend_model};
use crate::router::{GenerationBackend, Router};
use crate::types::{DataUri, Model, ModelInfo, catalog_entry};

/// Fixed reply stored when a request fails outright (transport failure or a
/// store error on the success path).
const FALLBACK_REPLY: &str =
    "Sorry, I encountered an error. Please check the logs or your API key.";

/// Non-blocking notice surfaced alongside the fallback reply.
const FAILURE_NOTICE: &str = "Failed to get a response from the model.";

/// The result of one submitted utterance.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// The conversation the turn belongs to.
    pub conversation_id: String,

    /// The stored reply. `None` when the conversation was deleted while the
    /// request was in flight and the reply was dropped.
    pub reply: Option<Message>,

    /// A non-blocking notice for the user, set on failure.
    pub notice: Option<String>,
}

/// Aggregated stats for a chat session.
#[derive(Debug, Clone)]
pub struct SessionStats {
    /// The selected model.
    pub model: ModelInfo,

    /// Number of conversations in the store.
    pub conversation_count: usize,

    /// Number of messages in the active conversation.
    pub active_messages: usize,

    /// Per-model request counts.
    pub traffic: BTreeMap<String, u64>,
}

/// A chat session that manages conversation state and backend interactions.
///
/// One `submit` call is one logical operation: all local mutations around the
/// single backend await are synchronous, and racing submits can only
/// interleave whole messages (every message carries a unique id).
pub struct ChatSession<B: GenerationBackend> {
    router: Router<B>,
    store: ConversationStore,
}

impl<B: GenerationBackend> ChatSession<B> {
    /// Creates a session over the given backend and store.
    pub fn new(backend: B, store: ConversationStore) -> Self {
        Self {
            router: Router::new(backend),
            store,
        }
    }

    /// Read access to the conversation store.
    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    /// Submits one utterance with an optional attached image.
    ///
    /// Returns `Ok(None)` for an empty submission (nothing is sent and no
    /// conversation is created). Backend failures do not surface as errors:
    /// they degrade to a stored reply plus a notice in the outcome. Only
    /// store I/O failures return `Err`.
    pub async fn submit(
        &mut self,
        utterance: &str,
        image: Option<DataUri>,
    ) -> Result<Option<TurnOutcome>> {
        if utterance.trim().is_empty() && image.is_none() {
            return Ok(None);
        }

        // Ensure an active conversation before any network call so the new
        // conversation is visible immediately.
        let conversation_id = match self.store.active_id() {
            Some(id) => id.to_string(),
            None => self.store.create(Conversation::auto_name(utterance))?,
        };

        let model_info = self.store.selected_model().clone();
        let model: Model = model_info.id.as_str().into();

        // Snapshot the outbound history at dispatch time: prior user/model
        // turns only, the new utterance appended by the router.
        let history = self
            .store
            .get(&conversation_id)
            .map(|c| c.history())
            .unwrap_or_default();

        let user = Message::user(utterance, &model_info.id, image.as_ref().map(|u| u.to_string()));
        let loading = Message::loading(&model_info.id);
        self.store.append_turn(&conversation_id, user, loading)?;

        // Traffic reflects attempts, not successes.
        self.store.record_traffic(&model_info.id)?;
        observability::CHAT_TURNS.click();

        let routed = self
            .router
            .route(utterance, history, &model, image.as_ref())
            .await;

        let (reply, notice) = match routed {
            Ok(reply) => (
                Message::ai(reply.text, &model_info.id, reply.image_url),
                None,
            ),
            Err(_) => {
                observability::CHAT_TURN_ERRORS.click();
                (
                    Message::ai(FALLBACK_REPLY, &model_info.id, None),
                    Some(FAILURE_NOTICE.to_string()),
                )
            }
        };

        let stored = self.store.resolve_turn(&conversation_id, reply.clone())?;
        Ok(Some(TurnOutcome {
            conversation_id,
            reply: stored.then_some(reply),
            notice,
        }))
    }

    /// Creates an explicit new chat and makes it active.
    pub fn new_chat(&mut self) -> Result<String> {
        let name = format!("Chat {}", self.store.conversations().len() + 1);
        self.store.create(name)
    }

    /// Makes a conversation active.
    pub fn select(&mut self, id: &str) -> bool {
        self.store.select(id)
    }

    /// Renames a conversation; blank names are a no-op.
    pub fn rename(&mut self, id: &str, name: &str) -> Result<bool> {
        self.store.rename(id, name)
    }

    /// Removes a conversation unconditionally. The caller is responsible for
    /// confirming first.
    pub fn remove(&mut self, id: &str) -> Result<bool> {
        self.store.remove(id)
    }

    /// Toggles feedback on a message in the active conversation.
    pub fn feedback(&mut self, message_id: &str, feedback: Feedback) -> Result<bool> {
        let Some(id) = self.store.active_id().map(str::to_string) else {
            return Ok(false);
        };
        self.store.set_feedback(&id, message_id, feedback)
    }

    /// Selects a model from the catalog by id. Unknown ids are rejected.
    pub fn set_model(&mut self, model_id: &str) -> Result<bool> {
        let Some(info) = catalog_entry(model_id) else {
            return Ok(false);
        };
        self.store.set_selected_model(info)?;
        Ok(true)
    }

    /// Asks the backend to recommend a model for a query, based on traffic.
    pub async fn recommend(&self, query: &str) -> Result<Recommendation> {
        recommend_model(self.router.backend(), query, self.store.traffic()).await
    }

    /// Returns the current session statistics snapshot.
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            model: self.store.selected_model().clone(),
            conversation_count: self.store.conversations().len(),
            active_messages: self
                .store
                .active()
                .map(|c| c.messages.len())
                .unwrap_or(0),
            traffic: self.store.traffic().clone(),
        }
    }
}
