//! Chat aggregate, conversation, and message types for ragchat.
//!
//! A `Chat` is identified by an opaque string id and owns a single
//! `Conversation`: an ordered history of human/AI messages. The serialized
//! shape is the persisted record shape:
//!
//! ```json
//! { "id": "...", "conversation": { "history": [ { "type": "human", "content": "hi" } ] } }
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;

/// Generate a fresh, unique chat identifier.
///
/// UUIDv7 in simple (hyphen-less) form, so ids are time-sortable.
pub fn generate_chat_id() -> String {
    Uuid::now_v7().simple().to_string()
}

/// A single role-tagged message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Message {
    Human { content: String },
    Ai { content: String },
}

impl Message {
    pub fn human(content: impl Into<String>) -> Self {
        Message::Human {
            content: content.into(),
        }
    }

    pub fn ai(content: impl Into<String>) -> Self {
        Message::Ai {
            content: content.into(),
        }
    }

    /// The text payload, regardless of role.
    pub fn content(&self) -> &str {
        match self {
            Message::Human { content } | Message::Ai { content } => content,
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Human { content } => write!(f, "Human: {content}"),
            Message::Ai { content } => write!(f, "AI: {content}"),
        }
    }
}

/// Ordered message history of a chat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    #[serde(default)]
    pub history: Vec<Message>,
}

/// The chat aggregate.
///
/// Created empty by `start_conversation` and replaced wholesale (never merged)
/// after every agent turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: String,
    #[serde(default)]
    pub conversation: Conversation,
}

impl Chat {
    /// A new chat with a generated id and an empty conversation.
    pub fn new() -> Self {
        Self::with_id(generate_chat_id())
    }

    /// An empty chat carrying an existing id.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            conversation: Conversation::default(),
        }
    }

    /// Replace the conversation history with `history`.
    pub fn update_conversation(&mut self, history: Vec<Message>) {
        self.conversation.history = history;
    }

    pub fn conversation_history(&self) -> &[Message] {
        &self.conversation.history
    }
}

impl Default for Chat {
    fn default() -> Self {
        Self::new()
    }
}
