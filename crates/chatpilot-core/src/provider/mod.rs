//! Provider contract and dispatch.
//!
//! A provider turns one prompt into one reply. Adapters implement
//! [`CompletionProvider`]; the widget only ever talks to them through a
//! [`ProviderService`] looked up in a [`ProviderRegistry`].

mod registry;
mod request;
mod response;
mod service;

pub use registry::ProviderRegistry;
pub use request::CompletionRequest;
pub use response::{CompletionResponse, PLACEHOLDER_TEXT};
pub use service::ProviderService;

pub use crate::TRACING_TARGET_PROVIDER as TRACING_TARGET;
use crate::Result;

/// Core trait for completion adapters.
///
/// Implementations are stateless with respect to the conversation: each call
/// carries everything it needs in the request. Provider-specific response
/// shapes must not leak out of [`CompletionProvider::complete`].
#[async_trait::async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Human-readable provider name used in logs and error messages.
    fn name(&self) -> &str;

    /// Sends the prompt and normalizes the reply.
    ///
    /// Missing or empty content is a successful placeholder response, not an
    /// error. Non-2xx statuses map to [`crate::ErrorKind::ProviderStatus`].
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse>;
}
