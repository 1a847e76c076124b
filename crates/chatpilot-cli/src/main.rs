#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod repl;
mod telemetry;
mod terminal;

use std::io;
use std::pin::pin;
use std::process;

use anyhow::Context;
use chatpilot_reqwest::ReqwestClient;
use chatpilot_widget::Widget;
use chatpilot_widget::events::{EventHub, WidgetEvent};
use futures::{Stream, StreamExt};
use tokio::io::BufReader;

use crate::config::Cli;
use crate::repl::Repl;
use crate::terminal::TerminalRenderer;

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "chatpilot_cli::startup";
pub const TRACING_TARGET_SHUTDOWN: &str = "chatpilot_cli::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "chatpilot_cli::config";
pub const TRACING_TARGET_REPL: &str = "chatpilot_cli::repl";
pub const TRACING_TARGET_EVENTS: &str = "chatpilot_cli::events";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SHUTDOWN,
            "application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SHUTDOWN,
            error = %error,
            "application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();
    telemetry::init_tracing()?;

    let options = cli.widget_options().await?;
    cli.log(&options);

    let registry = ReqwestClient::new(cli.http.clone())
        .context("failed to create HTTP client")?
        .into_registry();

    let events = EventHub::new();
    let event_log = tokio::spawn(log_events(events.stream()));

    let widget = Widget::builder(registry)
        .with_renderer(TerminalRenderer::stdout())
        .with_events(events)
        .build(options)
        .await;

    let mut repl = Repl::new(widget.clone(), io::stdout());
    let stdin = BufReader::new(tokio::io::stdin());

    tokio::select! {
        result = repl.run(stdin) => result?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!(target: TRACING_TARGET_SHUTDOWN, "interrupted");
        }
    }

    widget.destroy().await;

    // The event stream ends once the last widget handle drops the hub.
    drop(repl);
    drop(widget);
    let _ = event_log.await;

    Ok(())
}

/// Logs every widget event until the hub is dropped.
async fn log_events(events: impl Stream<Item = WidgetEvent>) {
    let mut events = pin!(events);
    while let Some(event) = events.next().await {
        match event.error_detail() {
            Some((message, error)) => tracing::warn!(
                target: TRACING_TARGET_EVENTS,
                event = event.name(),
                instance_id = %event.instance_id,
                status = ?error.status(),
                error = %error,
                "{message}"
            ),
            None => tracing::info!(
                target: TRACING_TARGET_EVENTS,
                event = event.name(),
                instance_id = %event.instance_id,
                "widget event"
            ),
        }
    }
}
