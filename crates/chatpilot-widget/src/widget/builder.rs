use std::sync::Arc;

use chatpilot_core::config::WidgetOptions;
use chatpilot_core::provider::ProviderRegistry;

use super::Widget;
use crate::events::EventHub;
use crate::render::{NullRenderer, Renderer};

/// Assembles a [`Widget`] from its collaborators.
///
/// The registry is required. The renderer defaults to [`NullRenderer`] and
/// the event hub to a fresh one; pass a shared hub to observe `ready`.
#[must_use]
pub struct WidgetBuilder {
    registry: Arc<ProviderRegistry>,
    renderer: Arc<dyn Renderer>,
    events: EventHub,
}

impl std::fmt::Debug for WidgetBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetBuilder")
            .field("registry", &self.registry)
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}

impl WidgetBuilder {
    pub(crate) fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self {
            registry,
            renderer: Arc::new(NullRenderer),
            events: EventHub::new(),
        }
    }

    /// Sets the renderer.
    pub fn with_renderer(self, renderer: impl Renderer + 'static) -> Self {
        self.with_shared_renderer(Arc::new(renderer))
    }

    /// Sets a renderer the host keeps a handle to.
    pub fn with_shared_renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = renderer;
        self
    }

    /// Sets the event hub.
    pub fn with_events(mut self, events: EventHub) -> Self {
        self.events = events;
        self
    }

    /// Resolves `options` and initializes the widget.
    ///
    /// Initialization failures are reported through `on_error` and the
    /// `error` event; the widget is returned either way.
    pub async fn build(self, options: WidgetOptions) -> Widget {
        let widget = Widget::new(self.registry, self.renderer, self.events, options.resolve());
        widget.initialize().await;
        widget
    }
}
