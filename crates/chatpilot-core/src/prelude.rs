//! Convenient re-exports for common use.

pub use crate::config::{
    Callbacks, Position, ProviderKind, Theme, WidgetConfig, WidgetOptions,
};
pub use crate::error::{BoxedError, Error, ErrorKind, Result};
pub use crate::message::{Message, MessageRole};
pub use crate::prompt::PromptBuilder;
pub use crate::provider::{
    CompletionProvider, CompletionRequest, CompletionResponse, ProviderRegistry, ProviderService,
};
