//! Conversation state machine.
//!
//! A conversation is either idle or awaiting exactly one reply. It knows
//! nothing about providers or rendering; the widget drives it and performs the
//! side effects each transition calls for.

use chatpilot_core::message::Message;
use strum::{AsRefStr, Display};

/// Why a submission was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, Display)]
#[strum(serialize_all = "snake_case")]
pub enum SubmitRejection {
    /// The text was empty after trimming.
    Empty,
    /// A reply is still pending.
    Busy,
}

/// An accepted submission awaiting its reply.
///
/// Consumed by [`Conversation::complete_success`] or
/// [`Conversation::complete_failure`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct PendingTurn {
    user_text: String,
}

impl PendingTurn {
    /// The trimmed text the user submitted.
    pub fn user_text(&self) -> &str {
        &self.user_text
    }
}

/// Messages plus the open and loading flags of one widget.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversation {
    messages: Vec<Message>,
    is_open: bool,
    is_loading: bool,
}

impl Conversation {
    /// Creates an empty, closed, idle conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages in the order they were appended.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// A copy of all messages.
    pub fn history(&self) -> Vec<Message> {
        self.messages.clone()
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Accepts a submission.
    ///
    /// Appends the user's message and enters the awaiting state. Empty text
    /// and submissions made while awaiting leave the conversation unchanged.
    pub fn begin_submit(&mut self, text: &str) -> Result<PendingTurn, SubmitRejection> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SubmitRejection::Empty);
        }
        if self.is_loading {
            return Err(SubmitRejection::Busy);
        }

        self.messages.push(Message::user(text));
        self.is_loading = true;

        Ok(PendingTurn {
            user_text: text.to_owned(),
        })
    }

    /// Appends the assistant reply and returns to idle.
    pub fn complete_success(&mut self, _turn: PendingTurn, reply: impl Into<String>) -> Message {
        self.finish(Message::assistant(reply))
    }

    /// Appends the error notice and returns to idle.
    pub fn complete_failure(&mut self, _turn: PendingTurn) -> Message {
        self.finish(Message::error())
    }

    /// Returns to idle without appending anything.
    ///
    /// Used when a reply arrives for a conversation that has since been
    /// replaced.
    pub fn abandon(&mut self, _turn: PendingTurn) {
        self.is_loading = false;
    }

    /// Appends the error notice without changing the loading flag.
    pub fn push_error_notice(&mut self) -> Message {
        let message = Message::error();
        self.messages.push(message.clone());
        message
    }

    /// A fresh, closed conversation that keeps the pending reply, if any.
    ///
    /// The new conversation stays busy until that reply is abandoned.
    pub fn restarted(&self) -> Self {
        Self {
            is_loading: self.is_loading,
            ..Self::default()
        }
    }

    fn finish(&mut self, message: Message) -> Message {
        self.messages.push(message.clone());
        self.is_loading = false;
        message
    }

    /// Opens the panel; returns false if it was already open.
    pub fn open(&mut self) -> bool {
        !std::mem::replace(&mut self.is_open, true)
    }

    /// Closes the panel; returns false if it was already closed.
    pub fn close(&mut self) -> bool {
        std::mem::replace(&mut self.is_open, false)
    }

    /// Removes every message. The open and loading flags are kept.
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

#[cfg(test)]
mod tests {
    use chatpilot_core::message::MessageRole;

    use super::*;

    #[test]
    fn submit_appends_user_message_and_awaits() {
        let mut conversation = Conversation::new();
        let turn = conversation.begin_submit("  Hello  ").unwrap();

        assert_eq!(turn.user_text(), "Hello");
        assert!(conversation.is_loading());
        assert_eq!(conversation.messages().len(), 1);
        assert_eq!(conversation.messages()[0].role(), MessageRole::User);
        assert_eq!(conversation.messages()[0].content(), "Hello");
    }

    #[test]
    fn empty_submission_is_ignored() {
        let mut conversation = Conversation::new();
        assert_eq!(conversation.begin_submit("   "), Err(SubmitRejection::Empty));
        assert!(conversation.messages().is_empty());
        assert!(!conversation.is_loading());
    }

    #[test]
    fn submission_while_awaiting_is_dropped() {
        let mut conversation = Conversation::new();
        let _turn = conversation.begin_submit("first").unwrap();

        assert_eq!(conversation.begin_submit("second"), Err(SubmitRejection::Busy));
        assert_eq!(conversation.messages().len(), 1);
    }

    #[test]
    fn success_and_failure_return_to_idle() {
        let mut conversation = Conversation::new();

        let turn = conversation.begin_submit("Hi").unwrap();
        let reply = conversation.complete_success(turn, "Hello!");
        assert_eq!(reply.role(), MessageRole::Assistant);
        assert!(!conversation.is_loading());

        let turn = conversation.begin_submit("Again").unwrap();
        let notice = conversation.complete_failure(turn);
        assert_eq!(notice.role(), MessageRole::Error);
        assert_eq!(
            notice.content(),
            "Sorry, I encountered an error. Please try again."
        );
        assert!(!conversation.is_loading());

        let roles: Vec<_> = conversation.messages().iter().map(Message::role).collect();
        assert_eq!(
            roles,
            [
                MessageRole::User,
                MessageRole::Assistant,
                MessageRole::User,
                MessageRole::Error
            ]
        );
    }

    #[test]
    fn open_and_close_are_idempotent() {
        let mut conversation = Conversation::new();
        assert!(conversation.open());
        assert!(!conversation.open());
        assert!(conversation.is_open());
        assert!(conversation.close());
        assert!(!conversation.close());
        assert!(!conversation.is_open());
    }

    #[test]
    fn restart_keeps_pending_reply() {
        let mut conversation = Conversation::new();
        conversation.open();
        let turn = conversation.begin_submit("Hi").unwrap();

        let mut restarted = conversation.restarted();
        assert!(restarted.messages().is_empty());
        assert!(!restarted.is_open());
        assert!(restarted.is_loading());
        assert_eq!(restarted.begin_submit("Again"), Err(SubmitRejection::Busy));

        restarted.abandon(turn);
        assert!(!restarted.is_loading());
        assert!(restarted.messages().is_empty());
    }

    #[test]
    fn error_notice_keeps_loading_flag() {
        let mut conversation = Conversation::new();
        let turn = conversation.begin_submit("Hi").unwrap();
        let notice = conversation.push_error_notice();

        assert_eq!(notice.role(), MessageRole::Error);
        assert!(conversation.is_loading());
        conversation.complete_success(turn, "Hey");
        assert_eq!(conversation.messages().len(), 3);
    }

    #[test]
    fn clear_keeps_flags() {
        let mut conversation = Conversation::new();
        conversation.open();
        let turn = conversation.begin_submit("Hi").unwrap();
        conversation.complete_success(turn, "Hey");

        conversation.clear();
        assert!(conversation.messages().is_empty());
        assert!(conversation.is_open());
        assert!(!conversation.is_loading());
    }
}
