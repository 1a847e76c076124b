//! Line-based interaction loop.

use std::io::Write;

use chatpilot_widget::{SubmitOutcome, Widget};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::TRACING_TARGET_REPL;
use crate::terminal::format_message;

/// Longest message accepted from the input line, in characters.
pub const MAX_INPUT_CHARS: usize = 1000;

const HELP: &str = "\
Commands:
  /open      open the chat
  /close     close the chat
  /toggle    open or close the chat
  /clear     clear the conversation
  /history   print the conversation
  /help      show this help
  /quit      exit
Any other line is sent to the assistant.";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open,
    Close,
    Toggle,
    Clear,
    History,
    Help,
    Quit,
    /// Text for the assistant, at most [`MAX_INPUT_CHARS`] characters.
    Submit(String),
    Unknown(String),
    Empty,
}

impl Command {
    /// Parses a line of input.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Empty;
        }

        let Some(command) = line.strip_prefix('/') else {
            return Self::Submit(line.chars().take(MAX_INPUT_CHARS).collect());
        };

        let name = command.split_whitespace().next().unwrap_or_default();
        match name.to_ascii_lowercase().as_str() {
            "open" => Self::Open,
            "close" => Self::Close,
            "toggle" => Self::Toggle,
            "clear" => Self::Clear,
            "history" => Self::History,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            _ => Self::Unknown(name.to_owned()),
        }
    }
}

/// Whether the loop keeps reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Reads commands and drives one widget.
pub struct Repl<W> {
    widget: Widget,
    out: W,
}

impl<W: Write> Repl<W> {
    /// Creates a loop writing command output to `out`.
    pub fn new(widget: Widget, out: W) -> Self {
        Self { widget, out }
    }

    /// Consumes the loop and returns the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Processes lines until `/quit` or end of input.
    pub async fn run<R>(&mut self, input: R) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            if self.dispatch(Command::parse(&line)).await? == Flow::Quit {
                break;
            }
        }
        Ok(())
    }

    async fn dispatch(&mut self, command: Command) -> anyhow::Result<Flow> {
        tracing::trace!(target: TRACING_TARGET_REPL, ?command, "Dispatching command");

        match command {
            Command::Open => self.widget.open().await,
            Command::Close => self.widget.close().await,
            Command::Toggle => self.widget.toggle().await,
            Command::Clear => self.widget.clear_history().await,
            Command::History => self.print_history().await?,
            Command::Help => writeln!(self.out, "{HELP}")?,
            Command::Quit => return Ok(Flow::Quit),
            Command::Submit(text) => self.submit(&text).await?,
            Command::Unknown(name) => {
                writeln!(self.out, "Unknown command /{name}. Type /help for commands.")?;
            }
            Command::Empty => {}
        }

        Ok(Flow::Continue)
    }

    async fn submit(&mut self, text: &str) -> anyhow::Result<()> {
        // Each line waits for its reply, so the widget is never busy here.
        match self.widget.submit(text).await {
            SubmitOutcome::Failed(_) => {
                tracing::debug!(target: TRACING_TARGET_REPL, "Turn failed");
            }
            SubmitOutcome::Ignored | SubmitOutcome::Discarded | SubmitOutcome::Responded(_) => {}
        }
        Ok(())
    }

    async fn print_history(&mut self) -> anyhow::Result<()> {
        let history = self.widget.history().await;
        if history.is_empty() {
            writeln!(self.out, "(no messages yet)")?;
            return Ok(());
        }

        let config = self.widget.config().await;
        for message in &history {
            writeln!(self.out, "{}", format_message(&config.assistant_name, message))?;
        }
        Ok(())
    }
}
