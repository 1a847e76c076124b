use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

use crate::TRACING_TARGET_CONFIG;

/// Built-in visual themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[derive(AsRefStr, Display, EnumIter, EnumString, IntoStaticStr)]
#[derive(Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Default,
    Dark,
    Minimal,
    Gradient,
    Rounded,
}

impl Theme {
    /// Parses a theme name, falling back to [`Theme::Default`] with a warning.
    pub fn from_name_or_default(name: &str) -> Self {
        name.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(
                target: TRACING_TARGET_CONFIG,
                theme = %name,
                fallback = %Self::Default,
                "Unknown theme, using fallback"
            );
            Self::Default
        })
    }

    /// Glyph shown on the launcher bubble.
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Default => "💬",
            Self::Dark => "🌙",
            Self::Minimal => "•",
            Self::Gradient => "✨",
            Self::Rounded => "💭",
        }
    }

    /// Accent color as a CSS hex string.
    pub const fn color(self) -> &'static str {
        match self {
            Self::Default => "#0057ff",
            Self::Dark => "#00d4ff",
            Self::Minimal => "#333",
            Self::Gradient => "#667eea",
            Self::Rounded => "#4CAF50",
        }
    }

    /// Stylesheet URL for this theme under `cdn_base`.
    pub fn stylesheet_url(self, cdn_base: &str) -> String {
        format!(
            "{}/styles/themes/{}.css",
            cdn_base.trim_end_matches('/'),
            self.as_ref()
        )
    }
}

/// Screen corner the widget is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[derive(AsRefStr, Display, EnumIter, EnumString, IntoStaticStr)]
#[derive(Serialize, Deserialize)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    #[default]
    BottomRight,
    BottomLeft,
    TopRight,
    TopLeft,
}

impl Position {
    /// Parses a position name, falling back to bottom-right with a warning.
    pub fn from_name_or_default(name: &str) -> Self {
        name.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(
                target: TRACING_TARGET_CONFIG,
                position = %name,
                fallback = %Self::BottomRight,
                "Unknown position, using fallback"
            );
            Self::BottomRight
        })
    }
}
