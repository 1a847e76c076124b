//! Shared reqwest client for the completion adapters.

use std::sync::Arc;

use chatpilot_core::config::ProviderKind;
use chatpilot_core::provider::{CompletionRequest, ProviderRegistry};
use reqwest::{Client, RequestBuilder};
use serde_json::Value;

use crate::{Error, GeminiProvider, OpenAiProvider, ReqwestConfig, Result, TRACING_TARGET};

/// Longest error body kept as context on a status error.
const MAX_ERROR_BODY_CHARS: usize = 1024;

/// Inner client that holds the HTTP client and configuration.
struct ReqwestClientInner {
    http: Client,
    config: ReqwestConfig,
}

/// Reqwest-based HTTP client shared by the Gemini and OpenAI adapters.
///
/// Cloning is cheap; all clones share one connection pool.
///
/// # Examples
///
/// ```rust,ignore
/// use chatpilot_reqwest::{ReqwestClient, ReqwestConfig};
///
/// let client = ReqwestClient::new(ReqwestConfig::default())?;
/// let registry = client.into_registry();
/// ```
#[derive(Clone)]
pub struct ReqwestClient {
    inner: Arc<ReqwestClientInner>,
}

impl std::fmt::Debug for ReqwestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestClient")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl ReqwestClient {
    /// Creates a new reqwest client with the given configuration.
    pub fn new(config: ReqwestConfig) -> Result<Self> {
        let user_agent = config.effective_user_agent();
        let timeout = config.timeout();

        tracing::debug!(
            target: TRACING_TARGET,
            timeout_ms = timeout.map(|t| t.as_millis() as u64),
            gemini_base_url = %config.gemini_base_url,
            openai_url = %config.openai_url,
            "Creating reqwest client"
        );

        let mut builder = Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self {
            inner: Arc::new(ReqwestClientInner { http, config }),
        })
    }

    /// Gets the underlying HTTP client.
    pub(crate) fn http(&self) -> &Client {
        &self.inner.http
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &ReqwestConfig {
        &self.inner.config
    }

    /// Creates a Gemini adapter sharing this client.
    pub fn gemini(&self) -> GeminiProvider {
        GeminiProvider::new(self.clone())
    }

    /// Creates an OpenAI adapter sharing this client.
    pub fn openai(&self) -> OpenAiProvider {
        OpenAiProvider::new(self.clone())
    }

    /// Converts this client into a registry holding both built-in adapters.
    pub fn into_registry(self) -> ProviderRegistry {
        ProviderRegistry::new()
            .with_provider(ProviderKind::GEMINI, self.gemini())
            .with_provider(ProviderKind::OPENAI, self.openai())
    }

    /// Sends a prepared request and returns the decoded JSON body.
    ///
    /// Non-2xx answers become status errors labelled with `provider`.
    pub(crate) async fn send_json(
        &self,
        provider: &str,
        request: &CompletionRequest,
        builder: RequestBuilder,
    ) -> chatpilot_core::Result<Value> {
        let response = builder.send().await.map_err(Error::from)?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                target: TRACING_TARGET,
                request_id = %request.request_id,
                provider,
                status = status.as_u16(),
                "Provider returned an error status"
            );

            let error = chatpilot_core::Error::provider_status(provider, status.as_u16());
            return Err(match body.trim() {
                "" => error,
                body => error.with_context(body.chars().take(MAX_ERROR_BODY_CHARS).collect::<String>()),
            });
        }

        let bytes = response.bytes().await.map_err(Error::from)?;
        let value = serde_json::from_slice(&bytes).map_err(Error::from)?;

        tracing::trace!(
            target: TRACING_TARGET,
            request_id = %request.request_id,
            provider,
            body_len = bytes.len(),
            "Provider response decoded"
        );

        Ok(value)
    }
}

/// Reads a string at `pointer`; anything else counts as missing.
pub(crate) fn extract_text<'a>(body: &'a Value, pointer: &str) -> Option<&'a str> {
    body.pointer(pointer).and_then(Value::as_str)
}
