use std::fmt;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

use super::{
    Callbacks, DEFAULT_ASSISTANT_NAME, DEFAULT_CDN_BASE, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE,
    Position, ProviderKind, Theme,
};
use crate::{Error, Result, TRACING_TARGET_CONFIG};

/// Raw widget options as supplied by a host.
///
/// Every field is optional. Field names follow the camelCase option names used
/// in option files, and `data` is accepted as an alias for `contextData`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[serde(rename_all = "camelCase", default)]
pub struct WidgetOptions {
    /// Provider API key.
    #[cfg_attr(feature = "config", arg(long = "api-key", env = "CHATPILOT_API_KEY"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Name the assistant answers as.
    #[cfg_attr(
        feature = "config",
        arg(long = "assistant-name", env = "CHATPILOT_ASSISTANT_NAME")
    )]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assistant_name: Option<String>,

    /// Business context prepended to every prompt.
    #[cfg_attr(feature = "config", arg(long = "context-data", env = "CHATPILOT_CONTEXT"))]
    #[serde(alias = "data", skip_serializing_if = "Option::is_none")]
    pub context_data: Option<String>,

    /// Provider name (`gemini`, `openai`, or a custom adapter name).
    #[cfg_attr(feature = "config", arg(long = "provider", env = "CHATPILOT_PROVIDER"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,

    /// Model identifier passed to the provider.
    #[cfg_attr(feature = "config", arg(long = "model", env = "CHATPILOT_MODEL"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Upper bound on generated tokens.
    #[cfg_attr(feature = "config", arg(long = "max-tokens", env = "CHATPILOT_MAX_TOKENS"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Sampling temperature.
    #[cfg_attr(
        feature = "config",
        arg(long = "temperature", env = "CHATPILOT_TEMPERATURE")
    )]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Open the panel as soon as the widget is ready.
    #[cfg_attr(feature = "config", arg(long = "auto-open", env = "CHATPILOT_AUTO_OPEN"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_open: Option<bool>,

    /// Show the typing indicator while a reply is pending.
    #[cfg_attr(
        feature = "config",
        arg(long = "show-typing-indicator", env = "CHATPILOT_SHOW_TYPING_INDICATOR")
    )]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_typing_indicator: Option<bool>,

    /// Render a small markdown subset in assistant replies.
    #[cfg_attr(
        feature = "config",
        arg(long = "enable-markdown", env = "CHATPILOT_ENABLE_MARKDOWN")
    )]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_markdown: Option<bool>,

    /// Theme name.
    #[cfg_attr(feature = "config", arg(long = "theme", env = "CHATPILOT_THEME"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    /// Anchor corner, e.g. `bottom-right`.
    #[cfg_attr(feature = "config", arg(long = "position", env = "CHATPILOT_POSITION"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,

    /// Extra CSS appended after the theme stylesheet.
    #[cfg_attr(feature = "config", arg(long = "custom-css", env = "CHATPILOT_CUSTOM_CSS"))]
    #[serde(rename = "customCSS", alias = "customCss", skip_serializing_if = "Option::is_none")]
    pub custom_css: Option<String>,

    /// Base URL theme stylesheets are loaded from.
    #[cfg_attr(feature = "config", arg(long = "cdn-base", env = "CHATPILOT_CDN_BASE"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cdn_base: Option<String>,

    /// Host callbacks; never read from files or flags.
    #[cfg_attr(feature = "config", arg(skip))]
    #[serde(skip)]
    pub callbacks: Callbacks,
}

impl WidgetOptions {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses options from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::from(e).with_context("widget options"))
    }

    /// Sets the API key.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the assistant name.
    #[must_use]
    pub fn with_assistant_name(mut self, name: impl Into<String>) -> Self {
        self.assistant_name = Some(name.into());
        self
    }

    /// Sets the business context text.
    #[must_use]
    pub fn with_context_data(mut self, context: impl Into<String>) -> Self {
        self.context_data = Some(context.into());
        self
    }

    /// Sets the provider name.
    #[must_use]
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Sets the model identifier.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the token limit.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Sets the temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Sets whether the panel opens on startup.
    #[must_use]
    pub fn with_auto_open(mut self, auto_open: bool) -> Self {
        self.auto_open = Some(auto_open);
        self
    }

    /// Sets whether the typing indicator is shown.
    #[must_use]
    pub fn with_show_typing_indicator(mut self, show: bool) -> Self {
        self.show_typing_indicator = Some(show);
        self
    }

    /// Sets whether assistant replies are rendered as markdown.
    #[must_use]
    pub fn with_enable_markdown(mut self, enable: bool) -> Self {
        self.enable_markdown = Some(enable);
        self
    }

    /// Sets the theme name.
    #[must_use]
    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }

    /// Sets the position name.
    #[must_use]
    pub fn with_position(mut self, position: impl Into<String>) -> Self {
        self.position = Some(position.into());
        self
    }

    /// Sets the custom CSS.
    #[must_use]
    pub fn with_custom_css(mut self, css: impl Into<String>) -> Self {
        self.custom_css = Some(css.into());
        self
    }

    /// Sets the stylesheet base URL.
    #[must_use]
    pub fn with_cdn_base(mut self, cdn_base: impl Into<String>) -> Self {
        self.cdn_base = Some(cdn_base.into());
        self
    }

    /// Sets the host callbacks.
    #[must_use]
    pub fn with_callbacks(mut self, callbacks: Callbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    /// Overlays `other` on top of `self`; fields set in `other` win.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            api_key: other.api_key.or(self.api_key),
            assistant_name: other.assistant_name.or(self.assistant_name),
            context_data: other.context_data.or(self.context_data),
            provider: other.provider.or(self.provider),
            model: other.model.or(self.model),
            max_tokens: other.max_tokens.or(self.max_tokens),
            temperature: other.temperature.or(self.temperature),
            auto_open: other.auto_open.or(self.auto_open),
            show_typing_indicator: other.show_typing_indicator.or(self.show_typing_indicator),
            enable_markdown: other.enable_markdown.or(self.enable_markdown),
            theme: other.theme.or(self.theme),
            position: other.position.or(self.position),
            custom_css: other.custom_css.or(self.custom_css),
            cdn_base: other.cdn_base.or(self.cdn_base),
            callbacks: self.callbacks.merge(other.callbacks),
        }
    }

    /// Fills in defaults and produces the immutable configuration.
    ///
    /// Values are not range-checked; providers reject what they cannot use.
    pub fn resolve(self) -> WidgetConfig {
        let provider = self
            .provider
            .as_deref()
            .map(ProviderKind::from_name)
            .unwrap_or_default();
        let model = self
            .model
            .unwrap_or_else(|| provider.default_model().to_owned());
        let theme = self
            .theme
            .as_deref()
            .map(Theme::from_name_or_default)
            .unwrap_or_default();
        let position = self
            .position
            .as_deref()
            .map(Position::from_name_or_default)
            .unwrap_or_default();

        let config = WidgetConfig {
            api_key: self.api_key.unwrap_or_default(),
            assistant_name: self
                .assistant_name
                .unwrap_or_else(|| DEFAULT_ASSISTANT_NAME.to_owned()),
            context_data: self.context_data.unwrap_or_default(),
            provider,
            model,
            max_tokens: self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            temperature: self.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            auto_open: self.auto_open.unwrap_or(false),
            show_typing_indicator: self.show_typing_indicator.unwrap_or(true),
            enable_markdown: self.enable_markdown.unwrap_or(false),
            theme,
            position,
            custom_css: self.custom_css.filter(|css| !css.is_empty()),
            cdn_base: self
                .cdn_base
                .filter(|base| !base.is_empty())
                .unwrap_or_else(|| DEFAULT_CDN_BASE.to_owned()),
            callbacks: self.callbacks,
        };

        tracing::debug!(
            target: TRACING_TARGET_CONFIG,
            provider = %config.provider,
            model = %config.model,
            theme = %config.theme,
            has_context = !config.context_data.is_empty(),
            "Resolved widget configuration"
        );

        config
    }
}

/// Fully resolved widget configuration.
///
/// Built once by [`WidgetOptions::resolve`] and replaced wholesale on update.
#[derive(Clone)]
pub struct WidgetConfig {
    pub api_key: String,
    pub assistant_name: String,
    pub context_data: String,
    pub provider: ProviderKind,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub auto_open: bool,
    pub show_typing_indicator: bool,
    pub enable_markdown: bool,
    pub theme: Theme,
    pub position: Position,
    pub custom_css: Option<String>,
    pub cdn_base: String,
    pub callbacks: Callbacks,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        WidgetOptions::default().resolve()
    }
}

impl fmt::Debug for WidgetConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetConfig")
            .field("api_key", &"<redacted>")
            .field("assistant_name", &self.assistant_name)
            .field("context_data_len", &self.context_data.len())
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("auto_open", &self.auto_open)
            .field("show_typing_indicator", &self.show_typing_indicator)
            .field("enable_markdown", &self.enable_markdown)
            .field("theme", &self.theme)
            .field("position", &self.position)
            .field("callbacks", &self.callbacks)
            .finish_non_exhaustive()
    }
}

impl WidgetConfig {
    /// Stylesheet URL of the configured theme.
    pub fn stylesheet_url(&self) -> String {
        self.theme.stylesheet_url(&self.cdn_base)
    }

    /// Text shown while a reply is pending.
    pub fn typing_text(&self) -> String {
        format!("{} is typing...", self.assistant_name)
    }
}
