//! Persistent conversation storage.
//!
//! The store owns the full client-side state (selected model, conversations,
//! per-model traffic) and persists it through an injected [`StorageBackend`].
//! Every mutation replaces and persists the whole document, so the stored
//! representation and the in-memory state agree after each operation.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use serde_json::{from_reader, to_writer_pretty};

use crate::chat::conversation::{Conversation, Feedback, Message};
use crate::error::{Error, Result};
use crate::types::{ModelInfo, catalog, catalog_entry};

/// The persisted document. Field names match the original storage keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreState {
    /// The model selected for new messages.
    #[serde(rename = "selectedModel", default = "default_model")]
    pub selected_model: ModelInfo,

    /// All conversations, newest first.
    #[serde(default)]
    pub conversations: Vec<Conversation>,

    /// Per-model request counts, incremented per attempt.
    #[serde(rename = "modelTraffic", default)]
    pub model_traffic: BTreeMap<String, u64>,
}

fn default_model() -> ModelInfo {
    catalog().into_iter().next().expect("catalog is never empty")
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            selected_model: default_model(),
            conversations: Vec::new(),
            model_traffic: BTreeMap::new(),
        }
    }
}

/// Pluggable persistence port: read once at startup, write on every mutation.
pub trait StorageBackend: Send {
    /// Loads the stored document, or `None` if nothing has been stored yet.
    fn load(&self) -> Result<Option<StoreState>>;

    /// Replaces the stored document.
    fn persist(&self, state: &StoreState) -> Result<()>;
}

/// File-backed storage: one pretty-printed JSON document.
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Creates storage backed by the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl StorageBackend for FileStorage {
    fn load(&self) -> Result<Option<StoreState>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let file = File::open(&self.path)
            .map_err(|err| Error::io("failed to open conversation store", err))?;
        let reader = BufReader::new(file);
        let state = from_reader(reader).map_err(|err| {
            Error::serialization("failed to parse conversation store", Some(Box::new(err)))
        })?;
        Ok(Some(state))
    }

    fn persist(&self, state: &StoreState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|err| Error::io("failed to create store directory", err))?;
        }
        let file = File::create(&self.path)
            .map_err(|err| Error::io("failed to create conversation store", err))?;
        let writer = BufWriter::new(file);
        to_writer_pretty(writer, state).map_err(|err| {
            Error::serialization("failed to serialize conversation store", Some(Box::new(err)))
        })
    }
}

/// In-memory storage for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStorage {
    state: Mutex<Option<StoreState>>,
}

impl MemoryStorage {
    /// Creates empty in-memory storage.
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStorage {
    fn load(&self) -> Result<Option<StoreState>> {
        Ok(self.state.lock().expect("storage poisoned").clone())
    }

    fn persist(&self, state: &StoreState) -> Result<()> {
        *self.state.lock().expect("storage poisoned") = Some(state.clone());
        Ok(())
    }
}

/// CRUD over persisted conversations plus the active-conversation pointer.
///
/// The active id is transient UI state and is not persisted; it always refers
/// to an existing conversation or is `None`.
pub struct ConversationStore {
    state: StoreState,
    active_id: Option<String>,
    storage: Box<dyn StorageBackend>,
}

impl ConversationStore {
    /// Opens the store, reading persisted state if present. The newest
    /// conversation, if any, becomes active.
    pub fn open(storage: Box<dyn StorageBackend>) -> Result<Self> {
        let state = storage.load()?.unwrap_or_default();
        let active_id = state.conversations.first().map(|c| c.id.clone());
        Ok(Self {
            state,
            active_id,
            storage,
        })
    }

    fn persist(&self) -> Result<()> {
        self.storage.persist(&self.state)
    }

    /// All conversations, newest first.
    pub fn conversations(&self) -> &[Conversation] {
        &self.state.conversations
    }

    /// Looks up a conversation by id.
    pub fn get(&self, id: &str) -> Option<&Conversation> {
        self.state.conversations.iter().find(|c| c.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Conversation> {
        self.state.conversations.iter_mut().find(|c| c.id == id)
    }

    /// The active conversation id, if any.
    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    /// The active conversation, if any.
    pub fn active(&self) -> Option<&Conversation> {
        let id = self.active_id.as_deref()?;
        self.get(id)
    }

    /// Makes a conversation active. Selecting a conversation also selects
    /// its last-used model when that model is in the catalog.
    pub fn select(&mut self, id: &str) -> bool {
        let Some(model_id) = self.get(id).map(|c| c.model.clone()) else {
            return false;
        };
        self.active_id = Some(id.to_string());
        if let Some(info) = catalog_entry(&model_id) {
            self.state.selected_model = info;
        }
        true
    }

    /// Creates a conversation with the given name and the selected model,
    /// inserts it newest-first, and makes it active.
    pub fn create(&mut self, name: impl Into<String>) -> Result<String> {
        let conversation = Conversation::new(name, self.state.selected_model.id.clone());
        let id = conversation.id.clone();
        self.state.conversations.insert(0, conversation);
        self.active_id = Some(id.clone());
        self.persist()?;
        Ok(id)
    }

    /// Renames a conversation. Whitespace is trimmed; a blank name is a
    /// no-op. Returns whether a rename happened.
    pub fn rename(&mut self, id: &str, name: &str) -> Result<bool> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(false);
        }
        let Some(conversation) = self.get_mut(id) else {
            return Ok(false);
        };
        conversation.name = name.to_string();
        self.persist()?;
        Ok(true)
    }

    /// Removes a conversation and all its messages. Confirmation is the
    /// caller's concern; removal here is unconditional. If the active
    /// conversation is removed, the new first conversation (or none)
    /// becomes active.
    pub fn remove(&mut self, id: &str) -> Result<bool> {
        let before = self.state.conversations.len();
        self.state.conversations.retain(|c| c.id != id);
        if self.state.conversations.len() == before {
            return Ok(false);
        }
        if self.active_id.as_deref() == Some(id) {
            self.active_id = self.state.conversations.first().map(|c| c.id.clone());
        }
        self.persist()?;
        Ok(true)
    }

    /// Appends a user message and a loading placeholder in a single state
    /// update. Any stale placeholder is removed first, so at most one
    /// loading message exists per conversation.
    pub fn append_turn(&mut self, id: &str, user: Message, loading: Message) -> Result<()> {
        let Some(conversation) = self.get_mut(id) else {
            return Err(Error::validation(
                "no such conversation",
                Some("conversation_id".to_string()),
            ));
        };
        conversation.remove_loading();
        conversation.messages.push(user);
        conversation.messages.push(loading);
        self.persist()
    }

    /// Removes the loading placeholder and appends the reply, in a single
    /// state update. Returns false (and stores nothing) when the
    /// conversation was deleted while the request was in flight.
    pub fn resolve_turn(&mut self, id: &str, reply: Message) -> Result<bool> {
        let Some(conversation) = self.get_mut(id) else {
            return Ok(false);
        };
        conversation.remove_loading();
        conversation.messages.push(reply);
        self.persist()?;
        Ok(true)
    }

    /// Toggles feedback on a message. Returns whether anything changed.
    pub fn set_feedback(
        &mut self,
        conversation_id: &str,
        message_id: &str,
        feedback: Feedback,
    ) -> Result<bool> {
        let Some(conversation) = self.get_mut(conversation_id) else {
            return Ok(false);
        };
        if !conversation.set_feedback(message_id, feedback) {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// Increments the traffic counter for a model and returns the new count.
    pub fn record_traffic(&mut self, model_id: &str) -> Result<u64> {
        let count = self
            .state
            .model_traffic
            .entry(model_id.to_string())
            .or_insert(0);
        *count += 1;
        let count = *count;
        self.persist()?;
        Ok(count)
    }

    /// Per-model request counts.
    pub fn traffic(&self) -> &BTreeMap<String, u64> {
        &self.state.model_traffic
    }

    /// The model selected for new messages.
    pub fn selected_model(&self) -> &ModelInfo {
        &self.state.selected_model
    }

    /// Selects a model for new messages. The active conversation, if any,
    /// follows the selection.
    pub fn set_selected_model(&mut self, model: ModelInfo) -> Result<()> {
        let model_id = model.id.clone();
        self.state.selected_model = model;
        if let Some(id) = self.active_id.clone()
            && let Some(conversation) = self.get_mut(&id)
        {
            conversation.model = model_id;
        }
        self.persist()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> ConversationStore {
        ConversationStore::open(Box::new(MemoryStorage::new())).unwrap()
    }

    #[test]
    fn open_empty_defaults() {
        let store = store();
        assert!(store.conversations().is_empty());
        assert!(store.active().is_none());
        assert_eq!(store.selected_model().id, "gemini-1.5-flash-latest");
        assert!(store.traffic().is_empty());
    }

    #[test]
    fn create_is_newest_first_and_active() {
        let mut store = store();
        let first = store.create("one").unwrap();
        let second = store.create("two").unwrap();

        assert_eq!(store.conversations()[0].id, second);
        assert_eq!(store.conversations()[1].id, first);
        assert_eq!(store.active_id(), Some(second.as_str()));
    }

    #[test]
    fn rename_trims_and_ignores_blank() {
        let mut store = store();
        let id = store.create("original").unwrap();

        assert!(store.rename(&id, "  renamed  ").unwrap());
        assert_eq!(store.get(&id).unwrap().name, "renamed");

        assert!(!store.rename(&id, "   ").unwrap());
        assert_eq!(store.get(&id).unwrap().name, "renamed");

        assert!(!store.rename("missing", "x").unwrap());
    }

    #[test]
    fn remove_active_falls_back_to_first() {
        let mut store = store();
        let a = store.create("a").unwrap();
        let b = store.create("b").unwrap();
        // b is newest-first and active.
        assert_eq!(store.active_id(), Some(b.as_str()));

        assert!(store.remove(&b).unwrap());
        assert_eq!(store.active_id(), Some(a.as_str()));

        assert!(store.remove(&a).unwrap());
        assert_eq!(store.active_id(), None);
    }

    #[test]
    fn remove_inactive_keeps_active() {
        let mut store = store();
        let a = store.create("a").unwrap();
        let b = store.create("b").unwrap();

        assert!(store.remove(&a).unwrap());
        assert_eq!(store.active_id(), Some(b.as_str()));
    }

    #[test]
    fn append_turn_enforces_single_loading() {
        let mut store = store();
        let id = store.create("chat").unwrap();

        store
            .append_turn(&id, Message::user("q1", "m", None), Message::loading("m"))
            .unwrap();
        store
            .append_turn(&id, Message::user("q2", "m", None), Message::loading("m"))
            .unwrap();

        let loading_count = store
            .get(&id)
            .unwrap()
            .messages
            .iter()
            .filter(|m| m.sender == crate::chat::Sender::Loading)
            .count();
        assert_eq!(loading_count, 1);
    }

    #[test]
    fn resolve_turn_replaces_loading() {
        let mut store = store();
        let id = store.create("chat").unwrap();
        store
            .append_turn(&id, Message::user("q", "m", None), Message::loading("m"))
            .unwrap();

        assert!(store.resolve_turn(&id, Message::ai("a", "m", None)).unwrap());
        let convo = store.get(&id).unwrap();
        assert!(!convo.has_loading());
        assert_eq!(convo.messages.len(), 2);
        assert_eq!(convo.messages[1].text, "a");
    }

    #[test]
    fn resolve_turn_targets_originating_conversation() {
        let mut store = store();
        let origin = store.create("origin").unwrap();
        store
            .append_turn(&origin, Message::user("q", "m", None), Message::loading("m"))
            .unwrap();

        // Switching the active conversation mid-flight does not redirect
        // the reply.
        let other = store.create("other").unwrap();
        assert_eq!(store.active_id(), Some(other.as_str()));

        assert!(store.resolve_turn(&origin, Message::ai("a", "m", None)).unwrap());
        assert_eq!(store.get(&origin).unwrap().messages.len(), 2);
        assert!(store.get(&other).unwrap().messages.is_empty());
    }

    #[test]
    fn resolve_turn_drops_reply_for_deleted_conversation() {
        let mut store = store();
        let id = store.create("chat").unwrap();
        store.remove(&id).unwrap();
        assert!(!store.resolve_turn(&id, Message::ai("a", "m", None)).unwrap());
    }

    #[test]
    fn traffic_counts_attempts() {
        let mut store = store();
        assert_eq!(store.record_traffic("m1").unwrap(), 1);
        assert_eq!(store.record_traffic("m1").unwrap(), 2);
        assert_eq!(store.record_traffic("m2").unwrap(), 1);
        assert_eq!(store.traffic().get("m1"), Some(&2));
    }

    #[test]
    fn select_follows_conversation_model() {
        let mut store = store();
        let id = store.create("chat").unwrap();
        store
            .set_selected_model(crate::types::catalog_entry("gemini-2.0-flash").unwrap())
            .unwrap();
        assert_eq!(store.get(&id).unwrap().model, "gemini-2.0-flash");

        let other = store.create("other").unwrap();
        assert_eq!(store.active_id(), Some(other.as_str()));

        assert!(store.select(&id));
        assert_eq!(store.selected_model().id, "gemini-2.0-flash");
        assert!(!store.select("missing"));
    }

    #[test]
    fn file_round_trip_is_lossless() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conversations.json");

        let state_before = {
            let mut store =
                ConversationStore::open(Box::new(FileStorage::new(&path))).unwrap();
            let id = store.create("round trip").unwrap();
            store
                .append_turn(
                    &id,
                    Message::user("q", "gemini-1.5-flash-latest", None),
                    Message::loading("gemini-1.5-flash-latest"),
                )
                .unwrap();
            store
                .resolve_turn(
                    &id,
                    Message::ai(
                        "a",
                        "gemini-1.5-flash-latest",
                        Some("data:image/png;base64,aW1n".to_string()),
                    ),
                )
                .unwrap();
            let msg_id = store.get(&id).unwrap().messages[1].id.clone();
            store.set_feedback(&id, &msg_id, Feedback::Good).unwrap();
            store.record_traffic("gemini-1.5-flash-latest").unwrap();
            store.state.clone()
        };

        let store = ConversationStore::open(Box::new(FileStorage::new(&path))).unwrap();
        assert_eq!(store.state, state_before);
        // The newest conversation becomes active on reload.
        assert_eq!(
            store.active_id(),
            Some(state_before.conversations[0].id.as_str())
        );
    }

    #[test]
    fn file_storage_defaults_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("missing.json"));
        assert!(storage.load().unwrap().is_none());
    }

    #[test]
    fn stored_document_uses_original_keys() {
        let state = StoreState::default();
        let value = serde_json::to_value(&state).unwrap();
        assert!(value.get("selectedModel").is_some());
        assert!(value.get("conversations").is_some());
        assert!(value.get("modelTraffic").is_some());
    }
}
