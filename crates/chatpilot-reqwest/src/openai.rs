//! OpenAI chat completions adapter.

use chatpilot_core::config::ProviderKind;
use chatpilot_core::provider::{CompletionProvider, CompletionRequest, CompletionResponse};
use serde::Serialize;

use crate::TRACING_TARGET;
use crate::client::{ReqwestClient, extract_text};

const CONTENT_POINTER: &str = "/choices/0/message/content";

#[derive(Debug, Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Completion adapter for the OpenAI chat completions API.
#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    client: ReqwestClient,
}

impl OpenAiProvider {
    /// Name used in logs and status errors.
    pub const NAME: &'static str = "OpenAI";

    /// Creates an adapter on top of a shared client.
    pub fn new(client: ReqwestClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl CompletionProvider for OpenAiProvider {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> chatpilot_core::Result<CompletionResponse> {
        let model = request.model_or(ProviderKind::OpenAi.default_model());
        let body = ChatCompletionBody {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        tracing::debug!(
            target: TRACING_TARGET,
            request_id = %request.request_id,
            model,
            "Sending OpenAI request"
        );

        let builder = self
            .client
            .http()
            .post(self.client.config().openai_url.clone())
            .bearer_auth(&request.api_key)
            .json(&body);

        let response = self.client.send_json(Self::NAME, request, builder).await?;
        Ok(CompletionResponse::from_content(
            request.request_id,
            extract_text(&response, CONTENT_POINTER),
        ))
    }
}

#[cfg(test)]
mod tests {
    use chatpilot_core::ErrorKind;
    use serde_json::json;
    use url::Url;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::ReqwestConfig;

    fn provider(server: &MockServer) -> OpenAiProvider {
        let url = Url::parse(&format!("{}/v1/chat/completions", server.uri())).unwrap();
        let config = ReqwestConfig::default().with_openai_url(url);
        ReqwestClient::new(config).unwrap().openai()
    }

    #[tokio::test]
    async fn sends_chat_completion_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_json(json!({
                "model": "gpt-3.5-turbo",
                "messages": [{"role": "user", "content": "User: Hi\nAssistant:"}],
                "max_tokens": 150,
                "temperature": 0.7
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "Hi! How can I help?"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        // An empty model falls back to gpt-3.5-turbo.
        let request = CompletionRequest::new("User: Hi\nAssistant:").with_api_key("sk-test");
        let response = provider(&server).complete(&request).await.unwrap();
        assert_eq!(response.text(), "Hi! How can I help?");
        assert_eq!(response.request_id, request.request_id);
    }

    #[tokio::test]
    async fn empty_content_yields_placeholder() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"content": ""}}]
            })))
            .mount(&server)
            .await;

        let request = CompletionRequest::new("p").with_model("gpt-4o");
        let response = provider(&server).complete(&request).await.unwrap();
        assert!(response.is_placeholder());
        assert_eq!(response.text(), "No response received");
    }

    #[tokio::test]
    async fn server_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let error = provider(&server)
            .complete(&CompletionRequest::new("p"))
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::ProviderStatus);
        assert_eq!(error.status(), Some(500));
        assert_eq!(error.to_string(), "[provider_status]: OpenAI API error: 500");
        assert!(error.context.is_none());
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_network_error() {
        let url = Url::parse("http://127.0.0.1:9/v1/chat/completions").unwrap();
        let config = ReqwestConfig::default().with_openai_url(url);
        let provider = ReqwestClient::new(config).unwrap().openai();

        let error = provider
            .complete(&CompletionRequest::new("p"))
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::NetworkError);
        assert!(error.is_retryable());
    }
}
