//! Answer generation against a chat model.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error};

use crate::deadline::with_deadline;
use crate::error::{RagError, Result};
use crate::llm::ChatModel;
use crate::memory::ConversationMemory;

/// Per-call generation parameters.
#[derive(Debug, Clone)]
pub struct GenerationOptions {
    /// Sampling temperature in `[0, 1]`.
    pub temperature: f32,
    /// Optional deadline for the model call.
    pub deadline: Option<Duration>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self { temperature: 0.8, deadline: None }
    }
}

impl GenerationOptions {
    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(RagError::InvalidConfig(format!(
                "temperature ({}) must be within [0, 1]",
                self.temperature
            )));
        }
        Ok(())
    }
}

/// Produces an answer from assembled context, a prompt, and a chat model.
///
/// One gateway call per invocation: the prompt is appended to the memory as
/// a user entry, the full memory is sent to the model, and the raw response
/// text comes back. There is no retry loop; a gateway failure is terminal
/// for the call. An empty-but-successful completion is passed through
/// unchanged.
pub struct AnswerGenerator {
    model: Arc<dyn ChatModel>,
}

impl AnswerGenerator {
    /// Create a generator over the given model gateway.
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    /// Append `prompt` to `memory` and complete against the model.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::GenerationFailed`] when the model gateway
    /// reports an error, [`RagError::Cancelled`] when the deadline elapses,
    /// and [`RagError::InvalidConfig`] for an out-of-range temperature.
    pub async fn generate(
        &self,
        memory: &mut ConversationMemory,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String> {
        options.validate()?;
        memory.push_user(prompt);

        let answer = with_deadline(options.deadline, async {
            self.model.complete(memory.entries(), options.temperature).await.map_err(|e| {
                error!(model = self.model.name(), error = %e, "model completion failed");
                RagError::GenerationFailed(format!("model '{}': {e}", self.model.name()))
            })
        })
        .await?;

        debug!(
            model = self.model.name(),
            entry_count = memory.len(),
            answer_len = answer.len(),
            "generation completed"
        );
        Ok(answer)
    }
}
