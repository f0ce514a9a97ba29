//! Language model gateway trait.

use async_trait::async_trait;

use crate::error::Result;
use crate::memory::Message;

/// A gateway to a chat-style language model.
///
/// Implementations serialize the ordered message log into the backend's
/// request format, invoke it at the given sampling temperature, and return
/// the raw text response. An empty response from a successful call is
/// returned as-is; only backend-reported failures become
/// [`RagError::LlmUnavailable`](crate::RagError::LlmUnavailable).
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Name of the underlying model, for logging and error reporting.
    fn name(&self) -> &str;

    /// Complete the conversation and return the model's text response.
    async fn complete(&self, messages: &[Message], temperature: f32) -> Result<String>;
}
