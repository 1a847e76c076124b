//! Convenient re-exports for common use.

pub use chatpilot_core::prelude::*;

pub use crate::conversation::{Conversation, PendingTurn, SubmitRejection};
pub use crate::events::{EventDetail, EventHub, EventKind, ListenerId, WidgetEvent};
pub use crate::render::{HtmlRenderer, NullRenderer, Renderer};
pub use crate::{SubmitOutcome, Widget, WidgetBuilder};
