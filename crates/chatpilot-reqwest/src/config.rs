//! Reqwest client configuration.

use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use url::Url;

/// Default base URL of the Gemini models API.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Default OpenAI chat completions endpoint.
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Configuration for the HTTP adapters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct ReqwestConfig {
    /// Base URL of the Gemini models API
    #[cfg_attr(
        feature = "config",
        arg(
            long = "gemini-base-url",
            env = "CHATPILOT_GEMINI_BASE_URL",
            default_value = DEFAULT_GEMINI_BASE_URL
        )
    )]
    #[serde(default = "default_gemini_base_url")]
    pub gemini_base_url: Url,

    /// OpenAI chat completions endpoint
    #[cfg_attr(
        feature = "config",
        arg(
            long = "openai-url",
            env = "CHATPILOT_OPENAI_URL",
            default_value = DEFAULT_OPENAI_URL
        )
    )]
    #[serde(default = "default_openai_url")]
    pub openai_url: Url,

    /// HTTP request timeout in seconds (unset waits indefinitely)
    #[cfg_attr(feature = "config", arg(long = "http-timeout", env = "HTTP_TIMEOUT"))]
    #[serde(default)]
    pub http_timeout: Option<u64>,

    /// User-Agent header to send with requests
    #[cfg_attr(
        feature = "config",
        arg(long = "http-user-agent", env = "HTTP_USER_AGENT")
    )]
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_gemini_base_url() -> Url {
    Url::parse(DEFAULT_GEMINI_BASE_URL).expect("default Gemini URL is valid")
}

fn default_openai_url() -> Url {
    Url::parse(DEFAULT_OPENAI_URL).expect("default OpenAI URL is valid")
}

impl Default for ReqwestConfig {
    fn default() -> Self {
        Self {
            gemini_base_url: default_gemini_base_url(),
            openai_url: default_openai_url(),
            http_timeout: None,
            user_agent: None,
        }
    }
}

impl ReqwestConfig {
    /// Returns the request timeout, if one is configured.
    ///
    /// Zero is treated as unset.
    pub fn timeout(&self) -> Option<Duration> {
        self.http_timeout
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Returns the effective user agent, using default if not set.
    pub fn effective_user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(Self::default_user_agent)
    }

    fn default_user_agent() -> String {
        format!("chatpilot/{}", env!("CARGO_PKG_VERSION"))
    }

    /// Set the Gemini base URL.
    #[must_use]
    pub fn with_gemini_base_url(mut self, url: Url) -> Self {
        self.gemini_base_url = url;
        self
    }

    /// Set the OpenAI endpoint.
    #[must_use]
    pub fn with_openai_url(mut self, url: Url) -> Self {
        self.openai_url = url;
        self
    }

    /// Set the timeout in seconds.
    #[must_use]
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.http_timeout = Some(timeout_secs);
        self
    }

    /// Set the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ReqwestConfig::default();
        assert_eq!(config.gemini_base_url.as_str(), DEFAULT_GEMINI_BASE_URL);
        assert_eq!(config.openai_url.as_str(), DEFAULT_OPENAI_URL);
        assert_eq!(config.timeout(), None);
        assert!(config.effective_user_agent().starts_with("chatpilot/"));
    }

    #[test]
    fn test_zero_timeout_is_unset() {
        assert_eq!(ReqwestConfig::default().with_timeout(0).timeout(), None);
        assert_eq!(
            ReqwestConfig::default().with_timeout(15).timeout(),
            Some(Duration::from_secs(15))
        );
    }

    #[test]
    fn test_deserialize_partial() {
        let config: ReqwestConfig =
            serde_json::from_str(r#"{"openai_url": "http://localhost:8080/v1/chat"}"#).unwrap();
        assert_eq!(config.openai_url.as_str(), "http://localhost:8080/v1/chat");
        assert_eq!(config.gemini_base_url.as_str(), DEFAULT_GEMINI_BASE_URL);
    }
}
