//! Widget configuration: raw options, defaults and the resolved config.
//!
//! Options arrive as [`WidgetOptions`] where every field is optional. They may
//! be layered (an option file first, then flags) and are finally resolved into
//! an immutable [`WidgetConfig`] by filling in the defaults below.

mod callbacks;
mod options;
mod provider_kind;
mod theme;

pub use callbacks::{Callbacks, ErrorHook, LifecycleHook, MessageHook};
pub use options::{WidgetConfig, WidgetOptions};
pub use provider_kind::ProviderKind;
pub use theme::{Position, Theme};

/// Default assistant name shown in the header and used in prompts.
pub const DEFAULT_ASSISTANT_NAME: &str = "Assistant";

/// Default upper bound on generated tokens.
pub const DEFAULT_MAX_TOKENS: u32 = 150;

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default base URL for theme stylesheets.
pub const DEFAULT_CDN_BASE: &str = "https://cdn.jsdelivr.net/npm/chatpilot@1.0.0";
