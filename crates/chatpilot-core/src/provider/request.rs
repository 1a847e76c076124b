use std::fmt;

use uuid::Uuid;

use crate::config::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, WidgetConfig};

/// A single completion request.
#[derive(Clone, PartialEq)]
pub struct CompletionRequest {
    /// Unique identifier for this request.
    pub request_id: Uuid,
    /// Fully assembled prompt.
    pub prompt: String,
    /// Model identifier; empty lets the adapter pick its default.
    pub model: String,
    /// Provider API key.
    pub api_key: String,
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

impl CompletionRequest {
    /// Creates a request with default generation settings.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            request_id: Uuid::now_v7(),
            prompt: prompt.into(),
            model: String::new(),
            api_key: String::new(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Creates a request carrying the model settings of `config`.
    pub fn from_config(prompt: impl Into<String>, config: &WidgetConfig) -> Self {
        Self::new(prompt)
            .with_model(config.model.clone())
            .with_api_key(config.api_key.clone())
            .with_max_tokens(config.max_tokens)
            .with_temperature(config.temperature)
    }

    /// Sets the model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the API key.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Sets the token limit.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Sets the temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Returns the configured model, or `default` when none is set.
    pub fn model_or<'a>(&'a self, default: &'a str) -> &'a str {
        if self.model.is_empty() {
            default
        } else {
            &self.model
        }
    }
}

impl fmt::Debug for CompletionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionRequest")
            .field("request_id", &self.request_id)
            .field("prompt_len", &self.prompt.len())
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish_non_exhaustive()
    }
}
