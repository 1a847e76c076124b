//! The widget: conversation, dispatch and lifecycle of one chat panel.

mod builder;

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use chatpilot_core::config::{WidgetConfig, WidgetOptions};
use chatpilot_core::message::Message;
use chatpilot_core::prompt::PromptBuilder;
use chatpilot_core::provider::{CompletionRequest, ProviderRegistry};
use chatpilot_core::{Error, Result};
use tokio::sync::RwLock;
use uuid::Uuid;

pub use builder::WidgetBuilder;

use crate::TRACING_TARGET;
use crate::conversation::Conversation;
use crate::events::{EventHub, EventKind, WidgetEvent};
use crate::render::Renderer;

const INITIALIZATION_FAILED: &str = "Initialization failed";
const MESSAGE_SENDING_FAILED: &str = "Message sending failed";

/// Result of [`Widget::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing happened: the text was empty, a reply was pending, or the
    /// widget is destroyed.
    Ignored,
    /// The reply arrived after the widget was torn down and was dropped.
    Discarded,
    /// The provider replied; holds the appended assistant message.
    Responded(Message),
    /// The call or the `on_message` hook failed; holds the appended error
    /// message.
    Failed(Message),
}

impl SubmitOutcome {
    /// The message appended by this submission's reply, if any.
    pub fn message(&self) -> Option<&Message> {
        match self {
            Self::Responded(message) | Self::Failed(message) => Some(message),
            Self::Ignored | Self::Discarded => None,
        }
    }
}

struct WidgetState {
    config: Arc<WidgetConfig>,
    conversation: Conversation,
    /// Bumped on teardown; replies from an older epoch are dropped.
    epoch: u64,
    destroyed: bool,
}

struct WidgetInner {
    id: Uuid,
    registry: Arc<ProviderRegistry>,
    renderer: Arc<dyn Renderer>,
    events: EventHub,
    state: RwLock<WidgetState>,
}

/// An embeddable chat assistant.
///
/// Cloning is cheap; clones control the same panel. State lives behind an
/// async lock that is released while a provider call is in flight, so
/// `open`, `close`, `history` and friends stay responsive during a request.
#[derive(Clone)]
pub struct Widget {
    inner: Arc<WidgetInner>,
}

impl fmt::Debug for Widget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Widget")
            .field("id", &self.inner.id)
            .finish_non_exhaustive()
    }
}

impl Widget {
    /// Starts building a widget that dispatches through `registry`.
    pub fn builder(registry: impl Into<Arc<ProviderRegistry>>) -> WidgetBuilder {
        WidgetBuilder::new(registry.into())
    }

    fn new(
        registry: Arc<ProviderRegistry>,
        renderer: Arc<dyn Renderer>,
        events: EventHub,
        config: WidgetConfig,
    ) -> Self {
        let state = WidgetState {
            config: Arc::new(config),
            conversation: Conversation::new(),
            epoch: 0,
            destroyed: false,
        };

        Self {
            inner: Arc::new(WidgetInner {
                id: Uuid::now_v7(),
                registry,
                renderer,
                events,
                state: RwLock::new(state),
            }),
        }
    }

    /// Identifier carried by every event of this instance.
    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    /// The hub this widget emits events on.
    pub fn events(&self) -> &EventHub {
        &self.inner.events
    }

    /// The current configuration.
    pub async fn config(&self) -> Arc<WidgetConfig> {
        self.inner.state.read().await.config.clone()
    }

    /// A copy of the conversation so far.
    pub async fn history(&self) -> Vec<Message> {
        self.inner.state.read().await.conversation.history()
    }

    pub async fn is_open(&self) -> bool {
        self.inner.state.read().await.conversation.is_open()
    }

    /// True while a reply is pending.
    pub async fn is_loading(&self) -> bool {
        self.inner.state.read().await.conversation.is_loading()
    }

    pub async fn is_destroyed(&self) -> bool {
        self.inner.state.read().await.destroyed
    }

    /// Mounts the renderer, opens if configured, then emits `ready`.
    async fn initialize(&self) {
        let config = self.config().await;

        tracing::debug!(
            target: TRACING_TARGET,
            instance_id = %self.inner.id,
            provider = %config.provider,
            model = %config.model,
            "Initializing widget"
        );

        if let Err(error) = self.inner.renderer.mount(&config).await {
            let error = Error::initialization()
                .with_message("renderer failed to mount")
                .with_source(error);
            self.report_error(&config, INITIALIZATION_FAILED, error).await;
            return;
        }

        if config.auto_open {
            self.set_open(Some(true)).await;
        }

        self.emit(EventKind::Ready).await;
    }

    /// Submits user text and waits for the reply.
    ///
    /// Empty text, submissions while a reply is pending, and submissions to a
    /// destroyed widget are ignored. Provider failures never escape: they
    /// append the error notice and are reported through `on_error` and the
    /// `error` event.
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        let (turn, config, epoch) = {
            let mut state = self.inner.state.write().await;
            if state.destroyed {
                tracing::debug!(
                    target: TRACING_TARGET,
                    instance_id = %self.inner.id,
                    "Submit on destroyed widget ignored"
                );
                return SubmitOutcome::Ignored;
            }

            let turn = match state.conversation.begin_submit(text) {
                Ok(turn) => turn,
                Err(reason) => {
                    tracing::debug!(
                        target: TRACING_TARGET,
                        instance_id = %self.inner.id,
                        reason = reason.as_ref(),
                        "Submission ignored"
                    );
                    return SubmitOutcome::Ignored;
                }
            };

            let renderer = &self.inner.renderer;
            log_render(renderer.render_messages(state.conversation.messages()).await);
            if state.config.show_typing_indicator {
                log_render(renderer.set_typing_indicator(true).await);
            }

            (turn, state.config.clone(), state.epoch)
        };

        let prompt = PromptBuilder::from_config(&config).build(turn.user_text());
        let request = CompletionRequest::from_config(prompt, &config);
        let result = match self.inner.registry.resolve(&config.provider) {
            Ok(service) => service.complete(&request).await,
            Err(error) => Err(error),
        };

        let mut state = self.inner.state.write().await;
        if state.destroyed || state.epoch != epoch {
            state.conversation.abandon(turn);
            tracing::debug!(
                target: TRACING_TARGET,
                instance_id = %self.inner.id,
                request_id = %request.request_id,
                "Discarding reply for torn-down widget"
            );
            return SubmitOutcome::Discarded;
        }

        let user_text = turn.user_text().to_owned();
        let (outcome, failure) = match result {
            Ok(response) => {
                let message = state.conversation.complete_success(turn, response.text);
                (SubmitOutcome::Responded(message), None)
            }
            Err(error) => {
                let message = state.conversation.complete_failure(turn);
                (SubmitOutcome::Failed(message), Some(error))
            }
        };

        let renderer = &self.inner.renderer;
        log_render(renderer.set_typing_indicator(false).await);
        log_render(renderer.render_messages(state.conversation.messages()).await);
        log_render(renderer.focus_input().await);
        drop(state);

        match (outcome, failure) {
            (SubmitOutcome::Responded(message), _) => {
                let notified = panic::catch_unwind(AssertUnwindSafe(|| {
                    config.callbacks.notify_message(&user_text, message.content());
                }));
                match notified {
                    Ok(()) => SubmitOutcome::Responded(message),
                    Err(_) => self.on_message_panicked(&config, epoch).await,
                }
            }
            (outcome, Some(error)) => {
                self.report_error(&config, MESSAGE_SENDING_FAILED, error).await;
                outcome
            }
            (outcome, None) => outcome,
        }
    }

    /// Treats a panicking `on_message` hook as a failed turn.
    async fn on_message_panicked(&self, config: &WidgetConfig, epoch: u64) -> SubmitOutcome {
        let notice = {
            let mut state = self.inner.state.write().await;
            if state.destroyed || state.epoch != epoch {
                return SubmitOutcome::Discarded;
            }
            let notice = state.conversation.push_error_notice();
            log_render(self.inner.renderer.render_messages(state.conversation.messages()).await);
            notice
        };

        let error = Error::internal_error().with_message("on_message callback panicked");
        self.report_error(config, MESSAGE_SENDING_FAILED, error).await;
        SubmitOutcome::Failed(notice)
    }

    /// Opens the panel. No-op if already open.
    pub async fn open(&self) {
        self.set_open(Some(true)).await;
    }

    /// Closes the panel. No-op if already closed.
    pub async fn close(&self) {
        self.set_open(Some(false)).await;
    }

    /// Opens a closed panel or closes an open one.
    pub async fn toggle(&self) {
        self.set_open(None).await;
    }

    /// Moves the panel to `desired`, or flips it when `None`.
    async fn set_open(&self, desired: Option<bool>) {
        let (config, opened) = {
            let mut state = self.inner.state.write().await;
            if state.destroyed {
                return;
            }

            let open = desired.unwrap_or(!state.conversation.is_open());
            let changed = if open {
                state.conversation.open()
            } else {
                state.conversation.close()
            };
            if !changed {
                return;
            }

            let renderer = &self.inner.renderer;
            log_render(renderer.set_panel_visible(open).await);
            if open {
                log_render(renderer.focus_input().await);
            }

            (state.config.clone(), open)
        };

        if opened {
            config.callbacks.notify_open();
            self.emit(EventKind::Open).await;
        } else {
            config.callbacks.notify_close();
            self.emit(EventKind::Close).await;
        }
    }

    /// Removes every message and resets the message view.
    pub async fn clear_history(&self) {
        let mut state = self.inner.state.write().await;
        if state.destroyed {
            return;
        }

        state.conversation.clear();
        log_render(self.inner.renderer.render_messages(&[]).await);
        log_render(self.inner.renderer.set_typing_indicator(false).await);

        tracing::debug!(
            target: TRACING_TARGET,
            instance_id = %self.inner.id,
            "History cleared"
        );
    }

    /// Tears the widget down and emits `destroy`.
    ///
    /// Later operations are no-ops and pending replies are discarded.
    pub async fn destroy(&self) {
        {
            let mut state = self.inner.state.write().await;
            if state.destroyed {
                return;
            }
            self.teardown(&mut state).await;
        }
        self.emit(EventKind::Destroy).await;
    }

    /// Replaces the configuration and reinitializes.
    ///
    /// Equivalent to `destroy` followed by a fresh initialization with
    /// `options` resolved against the defaults. History is discarded. A
    /// reply still in flight keeps new submissions out until it arrives,
    /// and is then dropped.
    pub async fn update_config(&self, options: WidgetOptions) {
        let config = Arc::new(options.resolve());
        {
            let mut state = self.inner.state.write().await;
            if state.destroyed {
                tracing::warn!(
                    target: TRACING_TARGET,
                    instance_id = %self.inner.id,
                    "Config update on destroyed widget ignored"
                );
                return;
            }
            self.teardown(&mut state).await;
            state.config = config;
            state.conversation = state.conversation.restarted();
            state.destroyed = false;
        }

        self.emit(EventKind::Destroy).await;
        self.initialize().await;
    }

    async fn teardown(&self, state: &mut WidgetState) {
        state.destroyed = true;
        state.epoch += 1;
        log_render(self.inner.renderer.unmount().await);

        tracing::debug!(
            target: TRACING_TARGET,
            instance_id = %self.inner.id,
            epoch = state.epoch,
            "Widget torn down"
        );
    }

    async fn report_error(&self, config: &WidgetConfig, context: &str, error: Error) {
        tracing::error!(
            target: TRACING_TARGET,
            instance_id = %self.inner.id,
            context,
            error = %error,
            "Widget error"
        );

        config.callbacks.notify_error(&error);
        let event = WidgetEvent::error(self.inner.id, context, Arc::new(error));
        self.inner.events.emit(event).await;
    }

    async fn emit(&self, kind: EventKind) {
        self.inner
            .events
            .emit(WidgetEvent::new(kind, self.inner.id))
            .await;
    }
}

fn log_render(result: Result<()>) {
    if let Err(error) = result {
        tracing::warn!(
            target: crate::TRACING_TARGET_RENDER,
            error = %error,
            "Renderer call failed"
        );
    }
}

#[cfg(test)]
mod tests;
