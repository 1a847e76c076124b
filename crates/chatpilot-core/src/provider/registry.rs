//! Provider registry: adapter lookup by name with a fallback.

use std::collections::HashMap;

use super::{CompletionProvider, ProviderService, TRACING_TARGET};
use crate::config::ProviderKind;
use crate::{Error, Result};

/// Registry of completion adapters keyed by provider name.
///
/// Names are matched case-insensitively. Lookups for unregistered names fall
/// back to the `gemini` adapter, mirroring how unknown `provider` options
/// behave.
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    providers: HashMap<String, ProviderService>,
    fallback: String,
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderRegistry {
    /// Creates an empty registry with `gemini` as the fallback.
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
            fallback: ProviderKind::GEMINI.to_owned(),
        }
    }

    /// Registers a provider, replacing any previous one under `name`.
    pub fn register<P>(&mut self, name: impl AsRef<str>, provider: P) -> &mut Self
    where
        P: CompletionProvider + 'static,
    {
        self.register_service(name, ProviderService::from_provider(provider))
    }

    /// Registers an already wrapped provider.
    pub fn register_service(
        &mut self,
        name: impl AsRef<str>,
        service: ProviderService,
    ) -> &mut Self {
        let name = normalize(name.as_ref());
        tracing::debug!(
            target: TRACING_TARGET,
            name = %name,
            provider = service.name(),
            "Registered completion provider"
        );
        self.providers.insert(name, service);
        self
    }

    /// Builder-style [`ProviderRegistry::register`].
    #[must_use]
    pub fn with_provider<P>(mut self, name: impl AsRef<str>, provider: P) -> Self
    where
        P: CompletionProvider + 'static,
    {
        self.register(name, provider);
        self
    }

    /// Changes the name unknown providers fall back to.
    #[must_use]
    pub fn with_fallback(mut self, name: impl AsRef<str>) -> Self {
        self.fallback = normalize(name.as_ref());
        self
    }

    /// Gets a provider by exact name.
    pub fn get(&self, name: &str) -> Option<&ProviderService> {
        self.providers.get(&normalize(name))
    }

    /// Returns true if a provider is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns all registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.providers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Resolves the adapter for `kind`.
    ///
    /// An unregistered kind resolves to the fallback with a warning. Fails
    /// only when the fallback is missing as well.
    pub fn resolve(&self, kind: &ProviderKind) -> Result<&ProviderService> {
        if let Some(service) = self.get(kind.as_str()) {
            return Ok(service);
        }

        match self.providers.get(&self.fallback) {
            Some(service) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    requested = %kind,
                    fallback = %self.fallback,
                    "Unknown provider, using fallback"
                );
                Ok(service)
            }
            None => Err(Error::configuration()
                .with_message(format!("no adapter registered for provider '{kind}'"))
                .with_context(format!("fallback '{}' is not registered", self.fallback))),
        }
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::ErrorKind;
    use crate::provider::{CompletionRequest, CompletionResponse};

    struct Fixed(&'static str);

    #[async_trait::async_trait]
    impl CompletionProvider for Fixed {
        fn name(&self) -> &str {
            self.0
        }

        async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
            Ok(CompletionResponse::from_content(request.request_id, Some(self.0)))
        }
    }

    fn registry() -> ProviderRegistry {
        ProviderRegistry::new()
            .with_provider("gemini", Fixed("Gemini"))
            .with_provider("OpenAI", Fixed("OpenAI"))
    }

    #[test]
    fn resolves_registered_names() {
        let registry = registry();
        assert_eq!(registry.resolve(&ProviderKind::OpenAi).unwrap().name(), "OpenAI");
        assert_eq!(registry.resolve(&ProviderKind::Gemini).unwrap().name(), "Gemini");
        assert_eq!(registry.names(), vec!["gemini", "openai"]);
    }

    #[test]
    fn unknown_provider_falls_back_to_gemini() {
        let registry = registry();
        let kind = ProviderKind::from_name("anthropic");
        assert_eq!(registry.resolve(&kind).unwrap().name(), "Gemini");
    }

    #[test]
    fn custom_provider_is_selected_by_name() {
        let registry = registry().with_provider("local", Fixed("Local"));
        let kind = ProviderKind::from_name("Local");
        assert_eq!(registry.resolve(&kind).unwrap().name(), "Local");
    }

    #[test]
    fn custom_kind_lookup_ignores_case() {
        let registry = registry().with_provider("local", Fixed("Local"));
        let kind = ProviderKind::Custom(" Local".into());
        assert_eq!(registry.resolve(&kind).unwrap().name(), "Local");
    }

    #[test]
    fn missing_fallback_is_a_configuration_error() {
        let registry = ProviderRegistry::new().with_provider("openai", Fixed("OpenAI"));
        let error = registry.resolve(&ProviderKind::Gemini).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Configuration);
    }

    #[tokio::test]
    async fn service_dispatches_to_provider() {
        let registry = registry();
        let service = registry.resolve(&ProviderKind::Gemini).unwrap();
        let request = CompletionRequest::new("prompt");
        let response = service.complete(&request).await.unwrap();

        assert_eq!(response.text(), "Gemini");
        assert_eq!(response.request_id, request.request_id);
        assert_ne!(response.response_id, Uuid::nil());
    }
}
