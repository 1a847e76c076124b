//! Line-oriented renderer writing the conversation to a terminal.

use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard};

use chatpilot_core::config::WidgetConfig;
use chatpilot_core::message::{Message, MessageRole};
use chatpilot_core::{Error, Result};
use chatpilot_widget::render::Renderer;

struct TerminalState<W> {
    out: W,
    assistant_name: String,
    /// Messages already printed; history is append-only between clears.
    printed: usize,
    mounted: bool,
}

/// Prints new messages as they arrive instead of redrawing the panel.
///
/// Panel visibility and the typing indicator are shown as status lines.
pub struct TerminalRenderer<W = io::Stdout> {
    state: Mutex<TerminalState<W>>,
}

impl TerminalRenderer {
    /// Creates a renderer writing to standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> TerminalRenderer<W> {
    /// Creates a renderer writing to `out`.
    pub fn new(out: W) -> Self {
        Self {
            state: Mutex::new(TerminalState {
                out,
                assistant_name: String::new(),
                printed: 0,
                mounted: false,
            }),
        }
    }

    /// Consumes the renderer and returns the writer.
    pub fn into_inner(self) -> W {
        match self.state.into_inner() {
            Ok(state) => state.out,
            Err(poisoned) => poisoned.into_inner().out,
        }
    }

    fn lock(&self) -> MutexGuard<'_, TerminalState<W>> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<W: Write> TerminalState<W> {
    fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.out, "{line}")?;
        self.out.flush()?;
        Ok(())
    }

    fn ensure_mounted(&self) -> Result<()> {
        if self.mounted {
            Ok(())
        } else {
            Err(Error::internal_error().with_message("Terminal renderer is not mounted"))
        }
    }
}

/// Formats one message as a transcript line.
pub fn format_message(assistant_name: &str, message: &Message) -> String {
    match message.role() {
        MessageRole::User => format!("You: {}", message.content()),
        MessageRole::Assistant => format!("{assistant_name}: {}", message.content()),
        MessageRole::Error => format!("! {}", message.content()),
    }
}

#[async_trait::async_trait]
impl<W: Write + Send> Renderer for TerminalRenderer<W> {
    async fn mount(&self, config: &WidgetConfig) -> Result<()> {
        let mut state = self.lock();
        if state.mounted {
            return Err(Error::initialization().with_message("Terminal renderer is already mounted"));
        }

        state.mounted = true;
        state.printed = 0;
        state.assistant_name = config.assistant_name.clone();
        let banner = format!(
            "{} {} is ready. Type /help for commands.",
            config.theme.icon(),
            config.assistant_name
        );
        state.write_line(&banner)
    }

    async fn unmount(&self) -> Result<()> {
        let mut state = self.lock();
        state.mounted = false;
        state.printed = 0;
        Ok(())
    }

    async fn render_messages(&self, messages: &[Message]) -> Result<()> {
        let mut state = self.lock();
        state.ensure_mounted()?;

        if messages.len() < state.printed {
            state.printed = 0;
            if messages.is_empty() {
                return state.write_line("(conversation cleared)");
            }
        }

        for message in &messages[state.printed..] {
            let line = format_message(&state.assistant_name, message);
            state.write_line(&line)?;
        }
        state.printed = messages.len();
        Ok(())
    }

    async fn set_panel_visible(&self, visible: bool) -> Result<()> {
        let mut state = self.lock();
        state.ensure_mounted()?;
        state.write_line(if visible { "[chat opened]" } else { "[chat closed]" })
    }

    async fn set_typing_indicator(&self, visible: bool) -> Result<()> {
        let mut state = self.lock();
        state.ensure_mounted()?;
        if visible {
            let line = format!("{} is typing...", state.assistant_name);
            state.write_line(&line)?;
        }
        Ok(())
    }

    async fn focus_input(&self) -> Result<()> {
        self.lock().ensure_mounted()
    }
}
