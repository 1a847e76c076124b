use std::sync::Mutex;

use chatpilot_core::ErrorKind;
use chatpilot_core::config::Callbacks;
use chatpilot_core::message::MessageRole;
use chatpilot_core::mock::{MockOutcome, MockProvider};
use chatpilot_reqwest::{ReqwestClient, ReqwestConfig};
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;
use crate::events::EventDetail;
use crate::render::HtmlRenderer;

type Log = Arc<Mutex<Vec<String>>>;

fn registry(mock: &MockProvider) -> ProviderRegistry {
    ProviderRegistry::new().with_provider("gemini", mock.clone())
}

/// Records callback invocations and events in one ordered log.
async fn recording_hub() -> (EventHub, Log) {
    let log = Log::default();
    let hub = EventHub::new();
    let sink = log.clone();
    hub.on_any(move |event| {
        let entry = match event.error_detail() {
            Some((message, error)) => format!("event:{} {message} {:?}", event.kind, error.status()),
            None => format!("event:{}", event.kind),
        };
        sink.lock().unwrap().push(entry);
    })
    .await;
    (hub, log)
}

fn recording_callbacks(log: &Log) -> Callbacks {
    let (on_message, on_error, on_open, on_close) =
        (log.clone(), log.clone(), log.clone(), log.clone());
    Callbacks::new()
        .with_on_message(move |user, reply| {
            on_message
                .lock()
                .unwrap()
                .push(format!("on_message:{user}|{reply}"));
        })
        .with_on_error(move |error| {
            on_error
                .lock()
                .unwrap()
                .push(format!("on_error:{:?}", error.status()));
        })
        .with_on_open(move || on_open.lock().unwrap().push("on_open".into()))
        .with_on_close(move || on_close.lock().unwrap().push("on_close".into()))
}

fn entries(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

#[tokio::test]
async fn submit_appends_reply_and_notifies() {
    let mock = MockProvider::replying("Hello! How can I help?");
    let (hub, log) = recording_hub().await;
    let widget = Widget::builder(registry(&mock))
        .with_events(hub)
        .build(WidgetOptions::new().with_callbacks(recording_callbacks(&log)))
        .await;

    let outcome = widget.submit("  Hi  ").await;

    let reply = outcome.message().unwrap();
    assert_eq!(reply.role(), MessageRole::Assistant);
    assert_eq!(reply.content(), "Hello! How can I help?");

    let history = widget.history().await;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].role(), MessageRole::User);
    assert_eq!(history[0].content(), "Hi");
    assert!(!widget.is_loading().await);

    let requests = mock.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].prompt, "User: Hi\nAssistant:");
    assert_eq!(requests[0].model, "gemini-1.5-flash");
    assert_eq!(requests[0].max_tokens, 150);

    assert_eq!(
        entries(&log),
        ["event:ready", "on_message:Hi|Hello! How can I help?"]
    );
}

#[tokio::test]
async fn empty_submission_is_ignored() {
    let mock = MockProvider::default();
    let widget = Widget::builder(registry(&mock))
        .build(WidgetOptions::new())
        .await;

    assert_eq!(widget.submit("   ").await, SubmitOutcome::Ignored);
    assert!(widget.history().await.is_empty());
    assert_eq!(mock.calls().await, 0);
}

#[tokio::test]
async fn context_data_is_prepended_to_prompt() {
    let mock = MockProvider::default();
    let widget = Widget::builder(registry(&mock))
        .build(WidgetOptions::new().with_context_data("Company: Acme"))
        .await;

    widget.submit("What do you sell?").await;

    let requests = mock.requests().await;
    assert_eq!(
        requests[0].prompt,
        "Company: Acme\n\nUser: What do you sell?\nAssistant:"
    );
}

#[tokio::test]
async fn provider_failure_appends_error_message() {
    let mock = MockProvider::failing(500);
    let (hub, log) = recording_hub().await;
    let widget = Widget::builder(registry(&mock))
        .with_events(hub)
        .build(WidgetOptions::new().with_callbacks(recording_callbacks(&log)))
        .await;

    let outcome = widget.submit("Hello").await;

    let SubmitOutcome::Failed(message) = outcome else {
        panic!("expected a failed outcome, got {outcome:?}");
    };
    assert_eq!(message.role(), MessageRole::Error);
    assert_eq!(
        message.content(),
        "Sorry, I encountered an error. Please try again."
    );
    assert!(!widget.is_loading().await);

    assert_eq!(
        entries(&log),
        [
            "event:ready",
            "on_error:Some(500)",
            "event:error Message sending failed Some(500)",
        ]
    );

    // The widget accepts the next submission after a failure.
    mock.push_outcome(MockOutcome::Reply("Back online".into())).await;
    let outcome = widget.submit("Retry").await;
    assert_eq!(outcome.message().unwrap().content(), "Back online");
}

#[tokio::test]
async fn placeholder_reply_is_not_an_error() {
    let mock = MockProvider::new(MockOutcome::Missing);
    let widget = Widget::builder(registry(&mock))
        .build(WidgetOptions::new())
        .await;

    let outcome = widget.submit("Hello").await;
    let SubmitOutcome::Responded(message) = outcome else {
        panic!("expected a reply, got {outcome:?}");
    };
    assert_eq!(message.content(), "No response received");
}

#[tokio::test]
async fn at_most_one_request_in_flight() {
    let mock = MockProvider::replying("first reply").gated();
    let widget = Widget::builder(registry(&mock))
        .build(WidgetOptions::new())
        .await;

    let pending = {
        let widget = widget.clone();
        tokio::spawn(async move { widget.submit("first").await })
    };
    mock.wait_for_calls(1).await;

    assert!(widget.is_loading().await);
    assert_eq!(widget.submit("second").await, SubmitOutcome::Ignored);
    assert_eq!(widget.history().await.len(), 1);

    // State stays readable and the panel stays usable while awaiting.
    widget.open().await;
    assert!(widget.is_open().await);

    mock.release(1);
    let outcome = pending.await.unwrap();
    assert_eq!(outcome.message().unwrap().content(), "first reply");
    assert_eq!(mock.calls().await, 1);

    let contents: Vec<_> = widget
        .history()
        .await
        .iter()
        .map(|message| message.content().to_owned())
        .collect();
    assert_eq!(contents, ["first", "first reply"]);
}

#[tokio::test]
async fn reply_after_update_config_is_discarded() {
    let mock = MockProvider::replying("late reply").gated();
    let (hub, log) = recording_hub().await;
    let widget = Widget::builder(registry(&mock))
        .with_events(hub)
        .build(WidgetOptions::new().with_callbacks(recording_callbacks(&log)))
        .await;

    let pending = {
        let widget = widget.clone();
        tokio::spawn(async move { widget.submit("Hello").await })
    };
    mock.wait_for_calls(1).await;

    widget
        .update_config(WidgetOptions::new().with_assistant_name("Max"))
        .await;
    assert!(widget.history().await.is_empty());
    assert!(widget.is_loading().await);

    // The old request still holds the single-flight slot.
    assert_eq!(widget.submit("Too soon").await, SubmitOutcome::Ignored);
    assert_eq!(mock.calls().await, 1);

    mock.release(1);
    assert_eq!(pending.await.unwrap(), SubmitOutcome::Discarded);
    assert!(widget.history().await.is_empty());
    assert!(!widget.is_loading().await);
    assert_eq!(widget.config().await.assistant_name, "Max");

    // No on_message for the stale reply; the old callbacks are gone anyway.
    assert_eq!(
        entries(&log),
        ["event:ready", "event:destroy", "event:ready"]
    );

    // A fresh turn works on the new configuration.
    mock.release(1);
    widget.submit("Again").await;
    assert_eq!(mock.requests().await[1].prompt, "User: Again\nMax:");
}

#[tokio::test]
async fn panicking_on_message_becomes_error() {
    let mock = MockProvider::replying("Hi there");
    let (hub, log) = recording_hub().await;
    let errors = log.clone();
    let callbacks = Callbacks::new()
        .with_on_message(|_, _| panic!("host hook failed"))
        .with_on_error(move |error| {
            errors
                .lock()
                .unwrap()
                .push(format!("on_error:{:?}", error.kind()));
        });
    let widget = Widget::builder(registry(&mock))
        .with_events(hub)
        .build(WidgetOptions::new().with_callbacks(callbacks))
        .await;

    let outcome = widget.submit("Hello").await;

    let SubmitOutcome::Failed(notice) = outcome else {
        panic!("expected a failed outcome, got {outcome:?}");
    };
    assert_eq!(notice.role(), MessageRole::Error);
    assert!(!widget.is_loading().await);

    let roles: Vec<_> = widget.history().await.iter().map(Message::role).collect();
    assert_eq!(
        roles,
        [MessageRole::User, MessageRole::Assistant, MessageRole::Error]
    );
    assert_eq!(
        entries(&log),
        [
            "event:ready",
            "on_error:InternalError",
            "event:error Message sending failed None",
        ]
    );
}

#[tokio::test]
async fn destroyed_widget_ignores_operations() {
    let mock = MockProvider::default();
    let (hub, log) = recording_hub().await;
    let widget = Widget::builder(registry(&mock))
        .with_events(hub)
        .build(WidgetOptions::new())
        .await;

    widget.destroy().await;
    widget.destroy().await;
    assert!(widget.is_destroyed().await);

    assert_eq!(widget.submit("Hello").await, SubmitOutcome::Ignored);
    widget.open().await;
    widget.update_config(WidgetOptions::new()).await;

    assert!(!widget.is_open().await);
    assert_eq!(mock.calls().await, 0);
    assert_eq!(entries(&log), ["event:ready", "event:destroy"]);
}

#[tokio::test]
async fn open_close_toggle_are_idempotent() {
    let (hub, log) = recording_hub().await;
    let renderer = Arc::new(HtmlRenderer::new());
    let widget = Widget::builder(ProviderRegistry::new())
        .with_shared_renderer(renderer.clone())
        .with_events(hub)
        .build(WidgetOptions::new().with_callbacks(recording_callbacks(&log)))
        .await;

    widget.open().await;
    widget.open().await;
    assert!(renderer.is_focused().await);
    widget.toggle().await;
    widget.close().await;
    widget.toggle().await;

    assert!(widget.is_open().await);
    assert_eq!(
        entries(&log),
        [
            "event:ready",
            "on_open",
            "event:open",
            "on_close",
            "event:close",
            "on_open",
            "event:open",
        ]
    );
}

#[tokio::test]
async fn auto_open_opens_before_ready() {
    let (hub, log) = recording_hub().await;
    let widget = Widget::builder(ProviderRegistry::new())
        .with_events(hub)
        .build(WidgetOptions::new().with_auto_open(true))
        .await;

    assert!(widget.is_open().await);
    assert_eq!(entries(&log), ["event:open", "event:ready"]);
}

#[tokio::test]
async fn clear_history_resets_view() {
    let mock = MockProvider::replying("**Sure**");
    let renderer = Arc::new(HtmlRenderer::new());
    let widget = Widget::builder(registry(&mock))
        .with_shared_renderer(renderer.clone())
        .build(WidgetOptions::new().with_enable_markdown(true))
        .await;

    widget.submit("Hi").await;
    let html = renderer.snapshot().await.unwrap();
    assert!(html.contains(r#"<div class="message assistant"><strong>Sure</strong></div>"#));
    assert!(!html.contains("typing-indicator show"));

    widget.clear_history().await;
    assert!(widget.history().await.is_empty());
    let html = renderer.snapshot().await.unwrap();
    assert!(!html.contains(r#"class="message"#));
    assert!(html.contains("Assistant is typing..."));

    widget.submit("Hi again").await;
    assert_eq!(widget.history().await.len(), 2);
}

struct BrokenRenderer;

#[async_trait::async_trait]
impl Renderer for BrokenRenderer {
    async fn mount(&self, _config: &WidgetConfig) -> Result<()> {
        Err(Error::internal_error().with_message("no display"))
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

#[tokio::test]
async fn mount_failure_is_reported_not_propagated() {
    let errors = Arc::new(Mutex::new(Vec::new()));
    let sink = errors.clone();
    let hub = EventHub::new();
    let mut events = hub.subscribe();

    let callbacks = Callbacks::new().with_on_error(move |error| {
        sink.lock().unwrap().push(error.kind());
    });
    let widget = Widget::builder(ProviderRegistry::new())
        .with_renderer(BrokenRenderer)
        .with_events(hub)
        .build(WidgetOptions::new().with_callbacks(callbacks))
        .await;

    assert_eq!(*errors.lock().unwrap(), [ErrorKind::Initialization]);

    let event = events.recv().await.unwrap();
    assert_eq!(event.kind, EventKind::Error);
    assert_eq!(event.instance_id, widget.id());
    let EventDetail::Error { message, .. } = &event.detail else {
        panic!("expected error detail");
    };
    assert_eq!(message, "Initialization failed");

    // No ready event follows a failed initialization.
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn unknown_provider_falls_back_to_gemini() {
    let gemini = MockProvider::replying("from gemini");
    let widget = Widget::builder(registry(&gemini))
        .build(WidgetOptions::new().with_provider("claude"))
        .await;

    let outcome = widget.submit("Hi").await;
    assert_eq!(outcome.message().unwrap().content(), "from gemini");
}

#[tokio::test]
async fn missing_fallback_fails_the_turn() {
    let widget = Widget::builder(ProviderRegistry::new())
        .build(WidgetOptions::new())
        .await;

    let outcome = widget.submit("Hi").await;
    assert!(matches!(outcome, SubmitOutcome::Failed(_)));
}

#[tokio::test]
async fn openai_round_trip_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_json(json!({
            "model": "gpt-3.5-turbo",
            "messages": [{"role": "user", "content": "User: Hello\nAssistant:"}],
            "max_tokens": 150,
            "temperature": 0.7
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "Hi there"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let url = Url::parse(&format!("{}/v1/chat/completions", server.uri())).unwrap();
    let client = ReqwestClient::new(ReqwestConfig::default().with_openai_url(url)).unwrap();
    let widget = Widget::builder(client.into_registry())
        .build(
            WidgetOptions::new()
                .with_provider("openai")
                .with_api_key("k")
                .with_model("gpt-3.5-turbo"),
        )
        .await;

    let outcome = widget.submit("Hello").await;
    assert_eq!(outcome.message().unwrap().content(), "Hi there");
}

#[tokio::test]
async fn gemini_without_candidates_yields_placeholder() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let errors = Arc::new(Mutex::new(0));
    let sink = errors.clone();
    let base = Url::parse(&format!("{}/v1beta/models", server.uri())).unwrap();
    let client = ReqwestClient::new(ReqwestConfig::default().with_gemini_base_url(base)).unwrap();
    let widget = Widget::builder(client.into_registry())
        .build(
            WidgetOptions::new()
                .with_api_key("k")
                .with_callbacks(Callbacks::new().with_on_error(move |_| *sink.lock().unwrap() += 1)),
        )
        .await;

    let outcome = widget.submit("Hello").await;
    let SubmitOutcome::Responded(message) = outcome else {
        panic!("expected a reply, got {outcome:?}");
    };
    assert_eq!(message.role(), MessageRole::Assistant);
    assert_eq!(message.content(), "No response received");
    assert_eq!(*errors.lock().unwrap(), 0);
}
