use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Selects which completion adapter a widget dispatches to.
///
/// Parsing never fails: names other than the built-ins become
/// [`ProviderKind::Custom`] and are looked up in the provider registry, which
/// falls back to Gemini when nothing is registered under the name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[derive(Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProviderKind {
    /// Google Gemini `generateContent` API.
    #[default]
    Gemini,
    /// OpenAI chat completions API.
    OpenAi,
    /// An adapter registered by the host under a custom name.
    Custom(String),
}

impl ProviderKind {
    /// Registry name of the Gemini adapter.
    pub const GEMINI: &'static str = "gemini";
    /// Registry name of the OpenAI adapter.
    pub const OPENAI: &'static str = "openai";

    /// Parses a provider name, case-insensitively.
    ///
    /// An empty name selects the default provider.
    pub fn from_name(name: &str) -> Self {
        let name = name.trim().to_ascii_lowercase();
        match name.as_str() {
            "" | Self::GEMINI => Self::Gemini,
            Self::OPENAI => Self::OpenAi,
            _ => Self::Custom(name),
        }
    }

    /// Returns the registry name of this provider.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Gemini => Self::GEMINI,
            Self::OpenAi => Self::OPENAI,
            Self::Custom(name) => name,
        }
    }

    /// Returns the model used when none is configured.
    ///
    /// Custom providers get an empty string and choose their own default.
    pub fn default_model(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini-1.5-flash",
            Self::OpenAi => "gpt-3.5-turbo",
            Self::Custom(_) => "",
        }
    }

    /// Returns true for one of the built-in HTTP adapters.
    pub fn is_builtin(&self) -> bool {
        !matches!(self, Self::Custom(_))
    }
}

impl FromStr for ProviderKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

impl From<String> for ProviderKind {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<ProviderKind> for String {
    fn from(kind: ProviderKind) -> Self {
        kind.as_str().to_owned()
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
