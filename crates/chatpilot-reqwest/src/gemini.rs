//! Gemini `generateContent` adapter.

use chatpilot_core::config::ProviderKind;
use chatpilot_core::provider::{CompletionProvider, CompletionRequest, CompletionResponse};
use serde::Serialize;

use crate::TRACING_TARGET;
use crate::client::{ReqwestClient, extract_text};

const CONTENT_POINTER: &str = "/candidates/0/content/parts/0/text";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentBody<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
}

/// Completion adapter for the Gemini models API.
#[derive(Debug, Clone)]
pub struct GeminiProvider {
    client: ReqwestClient,
}

impl GeminiProvider {
    /// Name used in logs and status errors.
    pub const NAME: &'static str = "Gemini";

    /// Creates an adapter on top of a shared client.
    pub fn new(client: ReqwestClient) -> Self {
        Self { client }
    }

    fn endpoint(&self, model: &str) -> String {
        let base = self.client.config().gemini_base_url.as_str();
        format!("{}/{model}:generateContent", base.trim_end_matches('/'))
    }
}

#[async_trait::async_trait]
impl CompletionProvider for GeminiProvider {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> chatpilot_core::Result<CompletionResponse> {
        let model = request.model_or(ProviderKind::Gemini.default_model());
        let body = GenerateContentBody {
            contents: vec![Content {
                parts: vec![Part {
                    text: &request.prompt,
                }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: request.max_tokens,
                temperature: request.temperature,
            },
        };

        tracing::debug!(
            target: TRACING_TARGET,
            request_id = %request.request_id,
            model,
            "Sending Gemini request"
        );

        let builder = self
            .client
            .http()
            .post(self.endpoint(model))
            .query(&[("key", request.api_key.as_str())])
            .json(&body);

        let response = self.client.send_json(Self::NAME, request, builder).await?;
        Ok(CompletionResponse::from_content(
            request.request_id,
            extract_text(&response, CONTENT_POINTER),
        ))
    }
}
