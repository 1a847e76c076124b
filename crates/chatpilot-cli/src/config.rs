//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── options: WidgetOptions   # assistant, provider, model, appearance
//! ├── http: ReqwestConfig      # provider endpoints and timeouts
//! └── context sources          # --config, --profile, --profile-file, --context-file
//! ```
//!
//! Options are layered: the JSON option file first, then the context source,
//! then flags and environment variables.
//!
//! # Example
//!
//! ```bash
//! chatpilot --provider openai --api-key sk-... --profile restaurant
//!
//! CHATPILOT_API_KEY=... CHATPILOT_PROVIDER=gemini chatpilot --config widget.json
//! ```

use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use chatpilot_core::config::WidgetOptions;
use chatpilot_profiles::{ContextProvider, Profile, ProfileKind};
use chatpilot_reqwest::ReqwestConfig;
use clap::Parser;

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_STARTUP};

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "chatpilot")]
#[command(about = "Chat with an AI assistant from the terminal")]
#[command(version)]
pub struct Cli {
    /// Widget options (assistant, provider, appearance).
    #[clap(flatten)]
    pub options: WidgetOptions,

    /// HTTP adapter configuration.
    #[clap(flatten)]
    pub http: ReqwestConfig,

    /// JSON file with widget options, using the camelCase option names
    #[arg(long = "config", env = "CHATPILOT_CONFIG")]
    pub config_file: Option<PathBuf>,

    /// Bundled business profile used as context
    #[arg(long = "profile", env = "CHATPILOT_PROFILE")]
    pub profile: Option<ProfileKind>,

    /// JSON file with a custom business profile of the `--profile` kind
    #[arg(long = "profile-file", requires = "profile")]
    pub profile_file: Option<PathBuf>,

    /// Plain-text file used as context
    #[arg(long = "context-file", conflicts_with = "profile")]
    pub context_file: Option<PathBuf>,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Builds the widget options from every configured source.
    pub async fn widget_options(&self) -> anyhow::Result<WidgetOptions> {
        let mut options = match &self.config_file {
            Some(path) => read_option_file(path).await?,
            None => WidgetOptions::new(),
        };

        if let Some(context) = self.context_source().await? {
            options = context.apply(options);
        }

        Ok(options.merge(self.options.clone()))
    }

    /// Reads the context from `--context-file` or the selected profile.
    async fn context_source(&self) -> anyhow::Result<Option<Box<dyn ContextProvider + Send>>> {
        if let Some(path) = &self.context_file {
            let text = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("failed to read context file {}", path.display()))?;
            return Ok(Some(Box::new(text.trim().to_owned())));
        }

        let Some(kind) = self.profile else {
            return Ok(None);
        };

        let profile = match &self.profile_file {
            Some(path) => {
                let json = tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("failed to read profile file {}", path.display()))?;
                Profile::from_json(kind, &json)
                    .with_context(|| format!("invalid {kind} profile in {}", path.display()))?
            }
            None => Profile::sample(kind).context("failed to load bundled profile")?,
        };

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            profile = %kind,
            name = profile.name(),
            "Using business profile as context"
        );

        Ok(Some(Box::new(profile)))
    }

    /// Logs configuration (no sensitive information).
    pub fn log(&self, options: &WidgetOptions) {
        tracing::debug!(
            target: TRACING_TARGET_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            features = ?Self::enabled_features(),
            "Build information"
        );

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            provider = options.provider.as_deref().unwrap_or_default(),
            model = options.model.as_deref().unwrap_or_default(),
            has_api_key = options.api_key.is_some(),
            context_chars = options.context_data.as_deref().map_or(0, str::len),
            gemini_base_url = %self.http.gemini_base_url,
            openai_url = %self.http.openai_url,
            http_timeout_secs = ?self.http.http_timeout,
            "Widget configuration"
        );
    }

    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}

async fn read_option_file(path: &Path) -> anyhow::Result<WidgetOptions> {
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read option file {}", path.display()))?;
    WidgetOptions::from_json(&json)
        .with_context(|| format!("invalid option file {}", path.display()))
}
