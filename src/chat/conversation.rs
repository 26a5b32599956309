//! Conversation and message entities.
//!
//! These are the persisted client-side records of a chat. Field names on the
//! wire match the stored-document schema (`imageUrl`, `createdAt`, lowercase
//! sender and feedback values).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{Content, Part, Role};

/// Number of characters of the first utterance used to auto-name a
/// conversation.
const AUTO_NAME_LEN: usize = 25;

/// Name given to a conversation whose first utterance is empty.
const FALLBACK_NAME: &str = "New Chat";

/// Who produced a message.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The end user.
    User,

    /// The model.
    Ai,

    /// A transient placeholder shown while a request is in flight. Always
    /// eventually replaced or removed.
    Loading,
}

/// User feedback on a model reply.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feedback {
    /// Thumbs up.
    Good,

    /// Thumbs down.
    Bad,
}

/// One message within a conversation.
///
/// Immutable once created, except for `feedback`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unique message id.
    pub id: String,

    /// The message text.
    pub text: String,

    /// Who produced the message.
    pub sender: Sender,

    /// The model identifier the message was sent to or produced by.
    pub model: String,

    /// User feedback, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<Feedback>,

    /// Creation time in epoch milliseconds.
    pub timestamp: i64,

    /// An attached or generated image, as a URL or data URI.
    #[serde(rename = "imageUrl", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Message {
    fn new(text: String, sender: Sender, model: String, image_url: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text,
            sender,
            model,
            feedback: None,
            timestamp: now_millis(),
            image_url,
        }
    }

    /// Creates a user message.
    pub fn user(text: impl Into<String>, model: impl Into<String>, image_url: Option<String>) -> Self {
        Self::new(text.into(), Sender::User, model.into(), image_url)
    }

    /// Creates a model reply.
    pub fn ai(text: impl Into<String>, model: impl Into<String>, image_url: Option<String>) -> Self {
        Self::new(text.into(), Sender::Ai, model.into(), image_url)
    }

    /// Creates a loading placeholder.
    pub fn loading(model: impl Into<String>) -> Self {
        Self::new("...".to_string(), Sender::Loading, model.into(), None)
    }
}

/// An ordered sequence of messages with a name and a last-used model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    /// Unique conversation id.
    pub id: String,

    /// User-editable display name.
    pub name: String,

    /// Messages, oldest first.
    pub messages: Vec<Message>,

    /// The last-used model identifier.
    pub model: String,

    /// Creation time in epoch milliseconds.
    #[serde(rename = "createdAt")]
    pub created_at: i64,
}

impl Conversation {
    /// Creates an empty conversation.
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            messages: Vec::new(),
            model: model.into(),
            created_at: now_millis(),
        }
    }

    /// Derives a display name from the first utterance: the first 25
    /// characters, or "New Chat" when the utterance is empty.
    pub fn auto_name(utterance: &str) -> String {
        if utterance.is_empty() {
            FALLBACK_NAME.to_string()
        } else {
            utterance.chars().take(AUTO_NAME_LEN).collect()
        }
    }

    /// True if a loading placeholder is present.
    pub fn has_loading(&self) -> bool {
        self.messages.iter().any(|m| m.sender == Sender::Loading)
    }

    /// Removes all loading placeholders.
    pub fn remove_loading(&mut self) {
        self.messages.retain(|m| m.sender != Sender::Loading);
    }

    /// Toggles feedback on a message: a re-click of the current value clears
    /// it, any other value replaces it. Only model replies accept feedback.
    ///
    /// Returns false if the message does not exist or is not a model reply.
    pub fn set_feedback(&mut self, message_id: &str, feedback: Feedback) -> bool {
        let Some(message) = self.messages.iter_mut().find(|m| m.id == message_id) else {
            return false;
        };
        if message.sender != Sender::Ai {
            return false;
        }
        message.feedback = if message.feedback == Some(feedback) {
            None
        } else {
            Some(feedback)
        };
        true
    }

    /// Maps the user and model turns onto wire content, preserving order.
    /// Loading placeholders are always excluded.
    pub fn history(&self) -> Vec<Content> {
        self.messages
            .iter()
            .filter_map(|m| match m.sender {
                Sender::User => Some(Content::new(Role::User, vec![Part::text(&m.text)])),
                Sender::Ai => Some(Content::new(Role::Model, vec![Part::text(&m.text)])),
                Sender::Loading => None,
            })
            .collect()
    }
}

/// Current time in epoch milliseconds.
pub fn now_millis() -> i64 {
    let now = time::OffsetDateTime::now_utc();
    (now.unix_timestamp_nanos() / 1_000_000) as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn auto_name_truncates() {
        assert_eq!(
            Conversation::auto_name("generate an image of a futuristic city"),
            "generate an image of a fu"
        );
        assert_eq!(Conversation::auto_name("hi"), "hi");
        assert_eq!(Conversation::auto_name(""), "New Chat");
    }

    #[test]
    fn auto_name_respects_char_boundaries() {
        let name = Conversation::auto_name("日本語のテキストで名前を付けるとどうなるかを確認する");
        assert_eq!(name.chars().count(), 25);
    }

    #[test]
    fn message_serialization_schema() {
        let mut message = Message::user("hello", "gemini-1.5-flash-latest", None);
        message.id = "m-1".to_string();
        message.timestamp = 1700000000000;

        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "m-1",
                "text": "hello",
                "sender": "user",
                "model": "gemini-1.5-flash-latest",
                "timestamp": 1700000000000i64
            })
        );
    }

    #[test]
    fn message_serialization_with_feedback_and_image() {
        let mut message = Message::ai("done", "m", Some("data:image/png;base64,aW1n".to_string()));
        message.id = "m-2".to_string();
        message.timestamp = 1;
        message.feedback = Some(Feedback::Good);

        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["sender"], "ai");
        assert_eq!(value["feedback"], "good");
        assert_eq!(value["imageUrl"], "data:image/png;base64,aW1n");
    }

    #[test]
    fn feedback_toggles() {
        let mut convo = Conversation::new("test", "m");
        convo.messages.push(Message::ai("reply", "m", None));
        let id = convo.messages[0].id.clone();

        assert!(convo.set_feedback(&id, Feedback::Good));
        assert_eq!(convo.messages[0].feedback, Some(Feedback::Good));

        // Re-click clears.
        assert!(convo.set_feedback(&id, Feedback::Good));
        assert_eq!(convo.messages[0].feedback, None);

        // Switching replaces.
        assert!(convo.set_feedback(&id, Feedback::Bad));
        assert!(convo.set_feedback(&id, Feedback::Good));
        assert_eq!(convo.messages[0].feedback, Some(Feedback::Good));
    }

    #[test]
    fn feedback_rejects_user_messages() {
        let mut convo = Conversation::new("test", "m");
        convo.messages.push(Message::user("hi", "m", None));
        let id = convo.messages[0].id.clone();
        assert!(!convo.set_feedback(&id, Feedback::Good));
        assert!(!convo.set_feedback("missing", Feedback::Good));
    }

    #[test]
    fn history_excludes_loading() {
        let mut convo = Conversation::new("test", "m");
        convo.messages.push(Message::user("q1", "m", None));
        convo.messages.push(Message::ai("a1", "m", None));
        convo.messages.push(Message::loading("m"));

        let history = convo.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, Role::User);
        assert_eq!(history[0].text(), "q1");
        assert_eq!(history[1].role, Role::Model);
        assert_eq!(history[1].text(), "a1");
    }

    #[test]
    fn remove_loading_keeps_order() {
        let mut convo = Conversation::new("test", "m");
        convo.messages.push(Message::user("q1", "m", None));
        convo.messages.push(Message::loading("m"));
        convo.messages.push(Message::ai("a1", "m", None));

        convo.remove_loading();
        assert_eq!(convo.messages.len(), 2);
        assert_eq!(convo.messages[0].text, "q1");
        assert_eq!(convo.messages[1].text, "a1");
        assert!(!convo.has_loading());
    }
}
