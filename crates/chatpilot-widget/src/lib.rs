#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod conversation;
pub mod events;
pub mod prelude;
pub mod render;
mod widget;

pub use widget::{SubmitOutcome, Widget, WidgetBuilder};

/// Tracing target for widget lifecycle and dispatch.
pub const TRACING_TARGET: &str = "chatpilot_widget";

/// Tracing target for event delivery.
pub const TRACING_TARGET_EVENTS: &str = "chatpilot_widget::events";

/// Tracing target for renderers.
pub const TRACING_TARGET_RENDER: &str = "chatpilot_widget::render";
