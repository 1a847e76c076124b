//! Conversation message types.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, IntoStaticStr};
use uuid::Uuid;

/// Text shown to the user when a turn fails.
pub const ERROR_MESSAGE_TEXT: &str = "Sorry, I encountered an error. Please try again.";

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, IntoStaticStr, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Text typed by the user.
    User,
    /// A provider reply.
    Assistant,
    /// The fixed notice appended when a turn fails.
    Error,
}

/// A single entry in the conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    id: Uuid,
    role: MessageRole,
    content: String,
    timestamp: Timestamp,
}

impl Message {
    fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            role,
            content: content.into(),
            timestamp: Timestamp::now(),
        }
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Creates an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    /// Creates the error notice shown after a failed turn.
    pub fn error() -> Self {
        Self::new(MessageRole::Error, ERROR_MESSAGE_TEXT)
    }

    /// Returns the message ID.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the message role.
    pub fn role(&self) -> MessageRole {
        self.role
    }

    /// Returns the message content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns when the message was appended.
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_roles() {
        assert_eq!(Message::user("Hello").role(), MessageRole::User);
        assert_eq!(Message::assistant("Hi!").role(), MessageRole::Assistant);
        assert_eq!(Message::error().role(), MessageRole::Error);
    }

    #[test]
    fn error_message_text_is_fixed() {
        assert_eq!(
            Message::error().content(),
            "Sorry, I encountered an error. Please try again."
        );
    }

    #[test]
    fn ids_are_unique() {
        let first = Message::user("a");
        let second = Message::user("b");
        assert_ne!(first.id(), second.id());
        assert!(first.timestamp() <= second.timestamp());
    }

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_value(Message::assistant("ok")).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], "ok");
    }
}
