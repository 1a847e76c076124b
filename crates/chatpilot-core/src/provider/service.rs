use std::fmt;
use std::sync::Arc;

use jiff::Timestamp;

use super::{CompletionProvider, CompletionRequest, CompletionResponse, TRACING_TARGET};
use crate::Result;

/// Completion provider wrapper with structured logging.
///
/// Cheap to clone; all clones share the same adapter.
#[derive(Clone)]
pub struct ProviderService {
    provider: Arc<dyn CompletionProvider>,
}

impl fmt::Debug for ProviderService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderService")
            .field("provider", &self.provider.name())
            .finish_non_exhaustive()
    }
}

impl ProviderService {
    /// Wraps a provider.
    pub fn from_provider<P>(provider: P) -> Self
    where
        P: CompletionProvider + 'static,
    {
        Self {
            provider: Arc::new(provider),
        }
    }

    /// Wraps an already shared provider.
    pub fn from_shared(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider }
    }

    /// Returns the wrapped provider's name.
    pub fn name(&self) -> &str {
        self.provider.name()
    }

    /// Dispatches a completion request.
    pub async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        let started_at = Timestamp::now();

        tracing::debug!(
            target: TRACING_TARGET,
            request_id = %request.request_id,
            provider = self.provider.name(),
            model = %request.model,
            prompt_len = request.prompt.len(),
            "Processing completion request"
        );

        let result = self.provider.complete(request).await;
        let elapsed = Timestamp::now().duration_since(started_at);

        match &result {
            Ok(response) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    request_id = %request.request_id,
                    response_id = %response.response_id,
                    provider = self.provider.name(),
                    placeholder = response.placeholder,
                    elapsed_ms = elapsed.as_millis(),
                    "Completion successful"
                );
            }
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    request_id = %request.request_id,
                    provider = self.provider.name(),
                    error = %error,
                    status = error.status(),
                    elapsed_ms = elapsed.as_millis(),
                    "Completion failed"
                );
            }
        }

        result
    }
}
