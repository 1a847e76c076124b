//! Scripted completion provider for tests.
//!
//! This module is only available when the `test-utils` feature is enabled:
//!
//! ```toml
//! [dev-dependencies]
//! chatpilot-core = { version = "...", features = ["test-utils"] }
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use chatpilot_core::mock::{MockOutcome, MockProvider};
//!
//! let provider = MockProvider::replying("Hi there!")
//!     .with_outcomes([MockOutcome::Status(500)]);
//! ```

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::{Mutex, Notify, Semaphore};

use crate::provider::{CompletionProvider, CompletionRequest, CompletionResponse};
use crate::{Error, Result};

/// What the mock does for one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOutcome {
    /// Reply with the given content (empty content yields the placeholder).
    Reply(String),
    /// Reply without any content.
    Missing,
    /// Fail as if the provider answered with this HTTP status.
    Status(u16),
    /// Fail as if the connection broke.
    Network,
}

#[derive(Debug, Default)]
struct MockState {
    outcomes: Mutex<VecDeque<MockOutcome>>,
    requests: Mutex<Vec<CompletionRequest>>,
    called: Notify,
}

/// Completion provider that replays scripted outcomes and records requests.
///
/// Queued outcomes are consumed in order; once the queue is empty every call
/// uses the default outcome. A gated mock holds each call until
/// [`MockProvider::release`] hands out a permit.
#[derive(Debug, Clone)]
pub struct MockProvider {
    name: Arc<str>,
    default: MockOutcome,
    gate: Option<Arc<Semaphore>>,
    state: Arc<MockState>,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new(MockOutcome::Reply("Mock response".to_owned()))
    }
}

impl MockProvider {
    /// Creates a mock with the given default outcome.
    pub fn new(default: MockOutcome) -> Self {
        Self {
            name: Arc::from("Mock"),
            default,
            gate: None,
            state: Arc::default(),
        }
    }

    /// Creates a mock that always replies with `text`.
    pub fn replying(text: impl Into<String>) -> Self {
        Self::new(MockOutcome::Reply(text.into()))
    }

    /// Creates a mock that always fails with `status`.
    pub fn failing(status: u16) -> Self {
        Self::new(MockOutcome::Status(status))
    }

    /// Sets the provider name.
    #[must_use]
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Arc::from(name);
        self
    }

    /// Queues outcomes ahead of the default one.
    ///
    /// Must be called before the mock is shared.
    #[must_use]
    pub fn with_outcomes(self, outcomes: impl IntoIterator<Item = MockOutcome>) -> Self {
        let state = MockState {
            outcomes: Mutex::new(outcomes.into_iter().collect()),
            ..MockState::default()
        };
        Self {
            state: Arc::new(state),
            ..self
        }
    }

    /// Holds every call until a permit is released.
    #[must_use]
    pub fn gated(mut self) -> Self {
        self.gate = Some(Arc::new(Semaphore::new(0)));
        self
    }

    /// Lets `count` held calls proceed.
    pub fn release(&self, count: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(count);
        }
    }

    /// Queues another outcome.
    pub async fn push_outcome(&self, outcome: MockOutcome) {
        self.state.outcomes.lock().await.push_back(outcome);
    }

    /// Number of calls received so far.
    pub async fn calls(&self) -> usize {
        self.state.requests.lock().await.len()
    }

    /// Copies of every request received so far.
    pub async fn requests(&self) -> Vec<CompletionRequest> {
        self.state.requests.lock().await.clone()
    }

    /// Waits until at least `count` calls have been received.
    pub async fn wait_for_calls(&self, count: usize) {
        loop {
            let called = self.state.called.notified();
            if self.calls().await >= count {
                return;
            }
            called.await;
        }
    }
}

#[async_trait::async_trait]
impl CompletionProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        self.state.requests.lock().await.push(request.clone());
        self.state.called.notify_waiters();

        if let Some(gate) = &self.gate {
            let permit = gate
                .acquire()
                .await
                .map_err(|e| Error::internal_error().with_source(e))?;
            permit.forget();
        }

        let outcome = self
            .state
            .outcomes
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| self.default.clone());

        match outcome {
            MockOutcome::Reply(text) => Ok(CompletionResponse::from_content(
                request.request_id,
                Some(&text),
            )),
            MockOutcome::Missing => Ok(CompletionResponse::from_content(request.request_id, None)),
            MockOutcome::Status(status) => Err(Error::provider_status(&self.name, status)),
            MockOutcome::Network => {
                Err(Error::network_error().with_message("mock connection failure"))
            }
        }
    }
}
