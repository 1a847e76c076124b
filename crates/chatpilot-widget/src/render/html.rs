use std::fmt::Write;

use chatpilot_core::config::WidgetConfig;
use chatpilot_core::message::{Message, MessageRole};
use chatpilot_core::{Error, Result};
use tokio::sync::Mutex;

use super::Renderer;
use super::markdown::{escape_html, to_html};
use crate::TRACING_TARGET_RENDER;

/// Static parts of the panel, captured at mount time.
#[derive(Debug, Clone)]
struct Frame {
    assistant_name: String,
    icon: &'static str,
    accent: &'static str,
    position: &'static str,
    stylesheet_url: String,
    custom_css: Option<String>,
    enable_markdown: bool,
}

#[derive(Debug, Clone)]
struct View {
    frame: Frame,
    messages: String,
    panel_open: bool,
    typing: bool,
    focused: bool,
}

/// Renderer that keeps the panel as an in-memory HTML fragment.
///
/// Message content is always escaped. Assistant replies go through
/// [`to_html`] when markdown is enabled.
#[derive(Debug, Default)]
pub struct HtmlRenderer {
    view: Mutex<Option<View>>,
}

impl HtmlRenderer {
    /// Creates an unmounted renderer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current fragment, or `None` when not mounted.
    pub async fn snapshot(&self) -> Option<String> {
        self.view.lock().await.as_ref().map(View::to_html)
    }

    /// Returns true while mounted.
    pub async fn is_mounted(&self) -> bool {
        self.view.lock().await.is_some()
    }

    /// Returns true if the text box currently has focus.
    pub async fn is_focused(&self) -> bool {
        self.view.lock().await.as_ref().is_some_and(|view| view.focused)
    }

    async fn update(&self, operation: &str, f: impl FnOnce(&mut View)) -> Result<()> {
        let mut view = self.view.lock().await;
        let view = view.as_mut().ok_or_else(|| {
            Error::internal_error()
                .with_message("renderer is not mounted")
                .with_context(operation.to_owned())
        })?;
        f(view);
        Ok(())
    }
}

impl View {
    fn render_message(&self, message: &Message) -> String {
        let content = match message.role() {
            MessageRole::Assistant if self.frame.enable_markdown => to_html(message.content()),
            _ => escape_html(message.content()),
        };
        format!(
            r#"<div class="message {}">{content}</div>"#,
            message.role().as_ref()
        )
    }

    fn to_html(&self) -> String {
        let frame = &self.frame;
        let name = escape_html(&frame.assistant_name);
        let mut html = String::new();

        let _ = writeln!(
            html,
            r#"<link rel="stylesheet" href="{}">"#,
            escape_html(&frame.stylesheet_url)
        );
        if let Some(css) = &frame.custom_css {
            let _ = writeln!(html, "<style>{}</style>", css.replace("</", "<\\/"));
        }
        let _ = writeln!(
            html,
            r#"<div id="chatpilot-container" class="chatpilot-{}" style="--chatpilot-accent: {}">"#,
            frame.position, frame.accent
        );
        let _ = writeln!(html, r#"<div id="chatpilot-bubble">{}</div>"#, frame.icon);
        let _ = writeln!(
            html,
            r#"<div id="chatpilot-panel"{}>"#,
            if self.panel_open { r#" class="open""# } else { "" }
        );
        let _ = writeln!(
            html,
            r#"<div class="chat-header"><span class="assistant-name">{name}</span></div>"#
        );
        let _ = writeln!(html, r#"<div class="chat-messages" id="chat-messages">"#);
        html.push_str(&self.messages);
        let _ = writeln!(
            html,
            r#"<div class="typing-indicator{}" id="typing-indicator">{name} is typing...</div>"#,
            if self.typing { " show" } else { "" }
        );
        html.push_str("</div>\n");
        let _ = writeln!(
            html,
            concat!(
                r#"<div class="chat-input-container">"#,
                r#"<input id="chat-input" type="text" placeholder="Ask me anything..." autocomplete="off" maxlength="1000"{}>"#,
                r#"<button id="send-button" type="button">Send</button></div>"#
            ),
            if self.focused { " autofocus" } else { "" }
        );
        html.push_str("</div>\n</div>\n");
        html
    }
}

#[async_trait::async_trait]
impl Renderer for HtmlRenderer {
    async fn mount(&self, config: &WidgetConfig) -> Result<()> {
        let frame = Frame {
            assistant_name: config.assistant_name.clone(),
            icon: config.theme.icon(),
            accent: config.theme.color(),
            position: config.position.into(),
            stylesheet_url: config.stylesheet_url(),
            custom_css: config.custom_css.clone(),
            enable_markdown: config.enable_markdown,
        };

        let mut view = self.view.lock().await;
        if view.is_some() {
            return Err(Error::initialization().with_message("panel is already mounted"));
        }

        tracing::debug!(
            target: TRACING_TARGET_RENDER,
            theme = %config.theme,
            position = frame.position,
            "Mounting HTML panel"
        );

        *view = Some(View {
            frame,
            messages: String::new(),
            panel_open: false,
            typing: false,
            focused: false,
        });
        Ok(())
    }

    async fn unmount(&self) -> Result<()> {
        self.view.lock().await.take();
        Ok(())
    }

    async fn render_messages(&self, messages: &[Message]) -> Result<()> {
        self.update("render_messages", |view| {
            view.messages = messages
                .iter()
                .map(|message| view.render_message(message) + "\n")
                .collect();
        })
        .await
    }

    async fn set_panel_visible(&self, visible: bool) -> Result<()> {
        self.update("set_panel_visible", |view| {
            view.panel_open = visible;
            if !visible {
                view.focused = false;
            }
        })
        .await
    }

    async fn set_typing_indicator(&self, visible: bool) -> Result<()> {
        self.update("set_typing_indicator", |view| view.typing = visible)
            .await
    }

    async fn focus_input(&self) -> Result<()> {
        self.update("focus_input", |view| view.focused = true).await
    }
}

#[cfg(test)]
mod tests {
    use chatpilot_core::config::WidgetOptions;

    use super::*;

    fn config(markdown: bool) -> WidgetConfig {
        WidgetOptions::new()
            .with_assistant_name("Bella")
            .with_theme("dark")
            .with_position("top-left")
            .with_enable_markdown(markdown)
            .resolve()
    }

    #[tokio::test]
    async fn mount_builds_panel_frame() {
        let renderer = HtmlRenderer::new();
        assert!(renderer.snapshot().await.is_none());

        renderer.mount(&config(false)).await.unwrap();
        let html = renderer.snapshot().await.unwrap();

        assert!(html.contains(r#"class="chatpilot-top-left""#));
        assert!(html.contains("🌙"));
        assert!(html.contains("--chatpilot-accent: #00d4ff"));
        assert!(html.contains("/styles/themes/dark.css"));
        assert!(html.contains(r#"<span class="assistant-name">Bella</span>"#));
        assert!(html.contains(r#"<div class="typing-indicator" id="typing-indicator">Bella is typing...</div>"#));
        assert!(!html.contains(r#"class="open""#));
    }

    #[tokio::test]
    async fn second_mount_fails() {
        let renderer = HtmlRenderer::new();
        renderer.mount(&config(false)).await.unwrap();
        assert!(renderer.mount(&config(false)).await.is_err());

        renderer.unmount().await.unwrap();
        assert!(!renderer.is_mounted().await);
        assert!(renderer.set_panel_visible(true).await.is_err());
    }

    #[tokio::test]
    async fn messages_are_escaped() {
        let renderer = HtmlRenderer::new();
        renderer.mount(&config(false)).await.unwrap();
        renderer
            .render_messages(&[Message::user("<b>hi</b>"), Message::assistant("**bold**")])
            .await
            .unwrap();

        let html = renderer.snapshot().await.unwrap();
        assert!(html.contains(r#"<div class="message user">&lt;b&gt;hi&lt;/b&gt;</div>"#));
        assert!(html.contains(r#"<div class="message assistant">**bold**</div>"#));
    }

    #[tokio::test]
    async fn markdown_applies_to_assistant_only() {
        let renderer = HtmlRenderer::new();
        renderer.mount(&config(true)).await.unwrap();
        renderer
            .render_messages(&[Message::user("**raw**"), Message::assistant("**bold**")])
            .await
            .unwrap();

        let html = renderer.snapshot().await.unwrap();
        assert!(html.contains(r#"<div class="message user">**raw**</div>"#));
        assert!(html.contains(r#"<div class="message assistant"><strong>bold</strong></div>"#));
    }

    #[tokio::test]
    async fn panel_and_typing_flags() {
        let renderer = HtmlRenderer::new();
        renderer.mount(&config(false)).await.unwrap();
        renderer.set_panel_visible(true).await.unwrap();
        renderer.set_typing_indicator(true).await.unwrap();
        renderer.focus_input().await.unwrap();

        let html = renderer.snapshot().await.unwrap();
        assert!(html.contains(r#"<div id="chatpilot-panel" class="open">"#));
        assert!(html.contains(r#"class="typing-indicator show""#));
        assert!(renderer.is_focused().await);

        renderer.set_panel_visible(false).await.unwrap();
        assert!(!renderer.is_focused().await);
    }
}
