use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{RwLock, broadcast};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::{Stream, StreamExt};

use super::{EventKind, WidgetEvent};
use crate::TRACING_TARGET_EVENTS;

/// Default number of events buffered per subscriber.
const DEFAULT_CAPACITY: usize = 64;

/// Callback invoked for each matching event.
pub type Listener = Arc<dyn Fn(&WidgetEvent) + Send + Sync>;

/// Handle returned by [`EventHub::on`], used to remove the listener again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

struct Registration {
    id: ListenerId,
    kind: Option<EventKind>,
    listener: Listener,
}

struct EventHubInner {
    listeners: RwLock<Vec<Registration>>,
    next_id: AtomicU64,
    sender: broadcast::Sender<WidgetEvent>,
}

/// Delivers widget events to listeners and subscribers.
///
/// Cloning is cheap and clones share registrations, so one hub can serve
/// several widgets. Listeners run synchronously in registration order before
/// the event is broadcast.
#[derive(Clone)]
pub struct EventHub {
    inner: Arc<EventHubInner>,
}

impl fmt::Debug for EventHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHub")
            .field("subscribers", &self.inner.sender.receiver_count())
            .finish_non_exhaustive()
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHub {
    /// Creates a hub with the default subscriber buffer.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a hub buffering up to `capacity` events per subscriber.
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            inner: Arc::new(EventHubInner {
                listeners: RwLock::new(Vec::new()),
                next_id: AtomicU64::new(1),
                sender,
            }),
        }
    }

    /// Registers a listener for one kind of event.
    pub async fn on(
        &self,
        kind: EventKind,
        listener: impl Fn(&WidgetEvent) + Send + Sync + 'static,
    ) -> ListenerId {
        self.register(Some(kind), Arc::new(listener)).await
    }

    /// Registers a listener for every event.
    pub async fn on_any(
        &self,
        listener: impl Fn(&WidgetEvent) + Send + Sync + 'static,
    ) -> ListenerId {
        self.register(None, Arc::new(listener)).await
    }

    async fn register(&self, kind: Option<EventKind>, listener: Listener) -> ListenerId {
        let id = ListenerId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        self.inner.listeners.write().await.push(Registration { id, kind, listener });

        tracing::trace!(
            target: TRACING_TARGET_EVENTS,
            listener_id = id.0,
            kind = kind.map(EventKind::event_name),
            "Listener registered"
        );

        id
    }

    /// Removes a listener; returns false if it was not registered.
    pub async fn off(&self, id: ListenerId) -> bool {
        let mut listeners = self.inner.listeners.write().await;
        let before = listeners.len();
        listeners.retain(|registration| registration.id != id);
        before != listeners.len()
    }

    /// Subscribes to every event emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<WidgetEvent> {
        self.inner.sender.subscribe()
    }

    /// Subscribes as a stream. Events missed by a slow consumer are skipped.
    pub fn stream(&self) -> impl Stream<Item = WidgetEvent> + Send + 'static {
        BroadcastStream::new(self.subscribe()).filter_map(|item| match item {
            Ok(event) => Some(event),
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                tracing::warn!(
                    target: TRACING_TARGET_EVENTS,
                    skipped,
                    "Event subscriber lagged"
                );
                None
            }
        })
    }

    /// Delivers an event to matching listeners, then to subscribers.
    pub async fn emit(&self, event: WidgetEvent) {
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .read()
            .await
            .iter()
            .filter(|registration| registration.kind.is_none_or(|kind| kind == event.kind))
            .map(|registration| registration.listener.clone())
            .collect();

        tracing::debug!(
            target: TRACING_TARGET_EVENTS,
            event = event.name(),
            instance_id = %event.instance_id,
            listeners = listeners.len(),
            "Emitting event"
        );

        for listener in listeners {
            listener(&event);
        }

        // No subscribers is not an error.
        let _ = self.inner.sender.send(event);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use uuid::Uuid;

    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<EventKind>>>, impl Fn(&WidgetEvent) + Send + Sync + 'static) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        (seen, move |event: &WidgetEvent| {
            sink.lock().unwrap().push(event.kind)
        })
    }

    #[tokio::test]
    async fn listeners_filter_by_kind() {
        let hub = EventHub::new();
        let (opens, on_open) = recorder();
        let (all, on_any) = recorder();
        hub.on(EventKind::Open, on_open).await;
        hub.on_any(on_any).await;

        hub.emit(WidgetEvent::new(EventKind::Ready, Uuid::nil())).await;
        hub.emit(WidgetEvent::new(EventKind::Open, Uuid::nil())).await;

        assert_eq!(*opens.lock().unwrap(), [EventKind::Open]);
        assert_eq!(*all.lock().unwrap(), [EventKind::Ready, EventKind::Open]);
    }

    #[tokio::test]
    async fn off_removes_listener() {
        let hub = EventHub::new();
        let (seen, listener) = recorder();
        let id = hub.on(EventKind::Close, listener).await;

        assert!(hub.off(id).await);
        assert!(!hub.off(id).await);

        hub.emit(WidgetEvent::new(EventKind::Close, Uuid::nil())).await;
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn subscribers_receive_events() {
        let hub = EventHub::new();
        let mut receiver = hub.subscribe();
        let mut stream = Box::pin(hub.stream());

        hub.emit(WidgetEvent::new(EventKind::Destroy, Uuid::nil())).await;

        assert_eq!(receiver.recv().await.unwrap().kind, EventKind::Destroy);
        assert_eq!(stream.next().await.unwrap().kind, EventKind::Destroy);
    }
}
