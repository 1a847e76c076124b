use jiff::Timestamp;
use serde::Serialize;
use uuid::Uuid;

/// Reply text used when a provider answers without usable content.
pub const PLACEHOLDER_TEXT: &str = "No response received";

/// Normalized reply from a completion provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionResponse {
    /// Identifier of the request this answers.
    pub request_id: Uuid,
    /// Unique identifier for this response.
    pub response_id: Uuid,
    /// Reply text, or [`PLACEHOLDER_TEXT`].
    pub text: String,
    /// True when the provider returned no usable content.
    pub placeholder: bool,
    /// When the response was received.
    pub received_at: Timestamp,
}

impl CompletionResponse {
    /// Creates a response from extracted content.
    ///
    /// `None` and the empty string both yield the placeholder reply.
    pub fn from_content(request_id: Uuid, content: Option<&str>) -> Self {
        let (text, placeholder) = match content {
            Some(text) if !text.is_empty() => (text.to_owned(), false),
            _ => (PLACEHOLDER_TEXT.to_owned(), true),
        };

        Self {
            request_id,
            response_id: Uuid::now_v7(),
            text,
            placeholder,
            received_at: Timestamp::now(),
        }
    }

    /// Returns the reply text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns true if this is the placeholder reply.
    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }
}
