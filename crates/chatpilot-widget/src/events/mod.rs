//! Lifecycle events and their delivery.
//!
//! Every widget reports `ready`, `open`, `close`, `error` and `destroy`
//! through an [`EventHub`]. Hosts either register listeners for a kind or
//! subscribe to the whole stream.

mod hub;

use std::sync::Arc;

use chatpilot_core::Error;
use jiff::Timestamp;
use strum::{AsRefStr, Display, EnumIter, IntoStaticStr};
use uuid::Uuid;

pub use hub::{EventHub, Listener, ListenerId};

/// Kinds of lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum EventKind {
    /// Initialization finished.
    Ready,
    /// The panel opened.
    Open,
    /// The panel closed.
    Close,
    /// A turn or the initialization failed.
    Error,
    /// The widget was torn down.
    Destroy,
}

impl EventKind {
    /// Namespaced event name, e.g. `chatpilot:ready`.
    pub const fn event_name(self) -> &'static str {
        match self {
            Self::Ready => "chatpilot:ready",
            Self::Open => "chatpilot:open",
            Self::Close => "chatpilot:close",
            Self::Error => "chatpilot:error",
            Self::Destroy => "chatpilot:destroy",
        }
    }
}

/// Payload attached to an event.
#[derive(Debug, Clone, Default)]
pub enum EventDetail {
    #[default]
    None,
    /// What failed, and the error that caused it.
    Error {
        message: String,
        error: Arc<Error>,
    },
}

/// A lifecycle event emitted by one widget instance.
#[derive(Debug, Clone)]
pub struct WidgetEvent {
    pub kind: EventKind,
    pub instance_id: Uuid,
    pub detail: EventDetail,
    pub timestamp: Timestamp,
}

impl WidgetEvent {
    /// Creates an event without detail.
    pub fn new(kind: EventKind, instance_id: Uuid) -> Self {
        Self {
            kind,
            instance_id,
            detail: EventDetail::None,
            timestamp: Timestamp::now(),
        }
    }

    /// Creates an `error` event.
    pub fn error(instance_id: Uuid, message: impl Into<String>, error: Arc<Error>) -> Self {
        Self {
            detail: EventDetail::Error {
                message: message.into(),
                error,
            },
            ..Self::new(EventKind::Error, instance_id)
        }
    }

    /// Namespaced name of this event.
    pub fn name(&self) -> &'static str {
        self.kind.event_name()
    }

    /// The failure carried by an `error` event.
    pub fn error_detail(&self) -> Option<(&str, &Error)> {
        match &self.detail {
            EventDetail::Error { message, error } => Some((message, error)),
            EventDetail::None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn event_names_are_namespaced() {
        for kind in EventKind::iter() {
            assert_eq!(kind.event_name(), format!("chatpilot:{kind}"));
        }
    }

    #[test]
    fn error_event_carries_detail() {
        let error = Arc::new(Error::provider_status("Gemini", 500));
        let event = WidgetEvent::error(Uuid::nil(), "Message sending failed", error);

        assert_eq!(event.name(), "chatpilot:error");
        let (message, error) = event.error_detail().unwrap();
        assert_eq!(message, "Message sending failed");
        assert_eq!(error.status(), Some(500));
    }
}
