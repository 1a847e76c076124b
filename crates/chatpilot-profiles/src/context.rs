//! Sources of the business context placed in front of every prompt.

use std::sync::Arc;

use chatpilot_core::config::WidgetOptions;

/// Produces the plain-text context for a widget.
///
/// Implemented for strings, for closures through [`from_fn`], and for every
/// bundled profile type.
pub trait ContextProvider {
    /// Returns the context text. An empty string means no context.
    fn context(&self) -> String;

    /// Stores the context in `options`, replacing any previous value.
    fn apply(&self, options: WidgetOptions) -> WidgetOptions {
        options.with_context_data(self.context())
    }
}

impl ContextProvider for str {
    fn context(&self) -> String {
        self.to_owned()
    }
}

impl ContextProvider for String {
    fn context(&self) -> String {
        self.clone()
    }
}

impl<T: ContextProvider + ?Sized> ContextProvider for &T {
    fn context(&self) -> String {
        (**self).context()
    }
}

impl<T: ContextProvider + ?Sized> ContextProvider for Box<T> {
    fn context(&self) -> String {
        (**self).context()
    }
}

impl<T: ContextProvider + ?Sized> ContextProvider for Arc<T> {
    fn context(&self) -> String {
        (**self).context()
    }
}

/// Context computed by a closure on every call.
#[derive(Clone)]
pub struct FnContext<F>(F);

impl<F> std::fmt::Debug for FnContext<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnContext").finish_non_exhaustive()
    }
}

impl<F> ContextProvider for FnContext<F>
where
    F: Fn() -> String,
{
    fn context(&self) -> String {
        (self.0)()
    }
}

/// Wraps a closure as a [`ContextProvider`].
pub fn from_fn<F>(f: F) -> FnContext<F>
where
    F: Fn() -> String,
{
    FnContext(f)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn strings_return_themselves() {
        assert_eq!("Shop hours: 9-5".context(), "Shop hours: 9-5");
        assert_eq!(String::from("abc").context(), "abc");
        assert_eq!("".context(), "");
    }

    #[test]
    fn closures_run_on_every_call() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let provider = from_fn(move || {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            format!("call {n}")
        });

        assert_eq!(provider.context(), "call 1");
        assert_eq!(provider.context(), "call 2");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn trait_objects() {
        let providers: Vec<Box<dyn ContextProvider>> =
            vec![Box::new("a".to_string()), Box::new(from_fn(|| "b".into()))];
        let texts: Vec<_> = providers.iter().map(|p| p.context()).collect();
        assert_eq!(texts, ["a", "b"]);
    }

    #[test]
    fn apply_sets_context_data() {
        let options = WidgetOptions::new().with_context_data("old");
        let options = "new context".apply(options);
        assert_eq!(options.context_data.as_deref(), Some("new context"));
    }
}
