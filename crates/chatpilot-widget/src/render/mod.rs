//! Rendering collaborators.
//!
//! The widget never draws anything itself. It tells a [`Renderer`] what the
//! panel should look like after every state change.

mod html;
pub mod markdown;

use chatpilot_core::Result;
use chatpilot_core::config::WidgetConfig;
use chatpilot_core::message::Message;

pub use html::HtmlRenderer;

/// Presentation layer driven by a widget.
///
/// Calls arrive in state order for one widget. Failures other than from
/// [`Renderer::mount`] are logged by the widget and otherwise ignored.
#[async_trait::async_trait]
pub trait Renderer: Send + Sync {
    /// Builds the panel for `config`. A failure aborts initialization.
    async fn mount(&self, config: &WidgetConfig) -> Result<()>;

    /// Removes the panel.
    async fn unmount(&self) -> Result<()>;

    /// Redraws the full message list.
    async fn render_messages(&self, messages: &[Message]) -> Result<()>;

    /// Shows or hides the panel.
    async fn set_panel_visible(&self, visible: bool) -> Result<()>;

    /// Shows or hides the typing indicator.
    async fn set_typing_indicator(&self, visible: bool) -> Result<()>;

    /// Moves input focus to the text box.
    async fn focus_input(&self) -> Result<()>;
}

/// Renderer that draws nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

#[async_trait::async_trait]
impl Renderer for NullRenderer {
    async fn mount(&self, _config: &WidgetConfig) -> Result<()> {
        Ok(())
    }

    async fn unmount(&self) -> Result<()> {
        Ok(())
    }

    async fn render_messages(&self, _messages: &[Message]) -> Result<()> {
        Ok(())
    }

    async fn set_panel_visible(&self, _visible: bool) -> Result<()> {
        Ok(())
    }

    async fn set_typing_indicator(&self, _visible: bool) -> Result<()> {
        Ok(())
    }

    async fn focus_input(&self) -> Result<()> {
        Ok(())
    }
}
