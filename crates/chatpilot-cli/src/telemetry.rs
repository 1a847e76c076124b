//! Tracing initialization.
//!
//! Logs go to standard error so they never interleave with the transcript on
//! standard output. The level is read from `RUST_LOG` and defaults to `warn`.
//!
//! ```bash
//! RUST_LOG=debug chatpilot
//! RUST_LOG=chatpilot_widget=trace,chatpilot_reqwest=debug chatpilot
//! ```

use std::io;

use anyhow::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Default filter when `RUST_LOG` is not set.
const DEFAULT_FILTER: &str = "warn";

/// Initializes the tracing subscriber for structured logging.
///
/// # Errors
///
/// Returns an error if a subscriber is already installed or `RUST_LOG` is
/// malformed.
pub(crate) fn init_tracing() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
        .context("Failed to create env filter")?;

    let fmt_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_level(true)
        .with_ansi(true);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))
}
