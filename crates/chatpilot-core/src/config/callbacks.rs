use std::fmt;
use std::sync::Arc;

use crate::Error;

/// Invoked with `(user_text, response_text)` after a successful reply.
pub type MessageHook = Arc<dyn Fn(&str, &str) + Send + Sync>;

/// Invoked with the failure that ended a turn or broke initialization.
pub type ErrorHook = Arc<dyn Fn(&Error) + Send + Sync>;

/// Invoked when the panel opens or closes.
pub type LifecycleHook = Arc<dyn Fn() + Send + Sync>;

/// Optional host callbacks carried alongside the widget configuration.
///
/// Hooks run synchronously on the task that drives the widget and must not
/// block.
#[derive(Clone, Default)]
pub struct Callbacks {
    pub on_message: Option<MessageHook>,
    pub on_error: Option<ErrorHook>,
    pub on_open: Option<LifecycleHook>,
    pub on_close: Option<LifecycleHook>,
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("on_message", &self.on_message.is_some())
            .field("on_error", &self.on_error.is_some())
            .field("on_open", &self.on_open.is_some())
            .field("on_close", &self.on_close.is_some())
            .finish()
    }
}

// Hooks cannot be compared, so equality only looks at which ones are set.
impl PartialEq for Callbacks {
    fn eq(&self, other: &Self) -> bool {
        self.on_message.is_some() == other.on_message.is_some()
            && self.on_error.is_some() == other.on_error.is_some()
            && self.on_open.is_some() == other.on_open.is_some()
            && self.on_close.is_some() == other.on_close.is_some()
    }
}

impl Callbacks {
    /// Creates an empty set of callbacks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the message hook.
    #[must_use]
    pub fn with_on_message(mut self, hook: impl Fn(&str, &str) + Send + Sync + 'static) -> Self {
        self.on_message = Some(Arc::new(hook));
        self
    }

    /// Sets the error hook.
    #[must_use]
    pub fn with_on_error(mut self, hook: impl Fn(&Error) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(hook));
        self
    }

    /// Sets the open hook.
    #[must_use]
    pub fn with_on_open(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_open = Some(Arc::new(hook));
        self
    }

    /// Sets the close hook.
    #[must_use]
    pub fn with_on_close(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_close = Some(Arc::new(hook));
        self
    }

    /// Overlays `other` on top of `self`; hooks set in `other` win.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            on_message: other.on_message.or(self.on_message),
            on_error: other.on_error.or(self.on_error),
            on_open: other.on_open.or(self.on_open),
            on_close: other.on_close.or(self.on_close),
        }
    }

    pub fn notify_message(&self, user_text: &str, response_text: &str) {
        if let Some(hook) = &self.on_message {
            hook(user_text, response_text);
        }
    }

    pub fn notify_error(&self, error: &Error) {
        if let Some(hook) = &self.on_error {
            hook(error);
        }
    }

    pub fn notify_open(&self) {
        if let Some(hook) = &self.on_open {
            hook();
        }
    }

    pub fn notify_close(&self) {
        if let Some(hook) = &self.on_close {
            hook();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn merge_prefers_later_hooks() {
        let calls = Arc::new(AtomicUsize::new(0));

        let first = {
            let calls = calls.clone();
            Callbacks::new().with_on_open(move || {
                calls.fetch_add(1, Ordering::SeqCst);
            })
        };
        let second = {
            let calls = calls.clone();
            Callbacks::new().with_on_open(move || {
                calls.fetch_add(10, Ordering::SeqCst);
            })
        };

        let merged = first.merge(second);
        merged.notify_open();
        merged.notify_close();

        assert_eq!(calls.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn debug_reports_presence_only() {
        let callbacks = Callbacks::new().with_on_error(|_| {});
        let debug = format!("{callbacks:?}");
        assert!(debug.contains("on_error: true"));
        assert!(debug.contains("on_message: false"));
    }
}
