//! Ollama gateway bindings for embeddings and chat completion.
//!
//! This module is only available when the `ollama` feature is enabled. It
//! talks to a local [Ollama](https://ollama.com/) server over HTTP:
//! [`OllamaEmbedder`] calls `/api/embeddings` and [`OllamaChatModel`] calls
//! `/api/chat` with streaming disabled.

use async_trait::async_trait;
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::llm::ChatModel;
use crate::memory::{Message, Role};

/// The default Ollama server address.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:11434";

/// The default embedding model.
pub const DEFAULT_EMBED_MODEL: &str = "nomic-embed-text:latest";

/// The default dimensionality of `nomic-embed-text` embeddings.
const DEFAULT_EMBED_DIMENSIONS: usize = 768;

/// An [`EmbeddingProvider`] backed by the Ollama embeddings API.
///
/// # Example
///
/// ```rust,ignore
/// use ragpipe::ollama::OllamaEmbedder;
///
/// let embedder = OllamaEmbedder::new().with_server_url("http://localhost:11434");
/// let embedding = embedder.embed("hello world").await?;
/// ```
pub struct OllamaEmbedder {
    client: reqwest::Client,
    server_url: String,
    model: String,
    dimensions: usize,
}

impl Default for OllamaEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl OllamaEmbedder {
    /// Create an embedder for the default server and model
    /// (`nomic-embed-text:latest`, 768 dimensions).
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            server_url: DEFAULT_SERVER_URL.into(),
            model: DEFAULT_EMBED_MODEL.into(),
            dimensions: DEFAULT_EMBED_DIMENSIONS,
        }
    }

    /// Set the Ollama server address.
    pub fn with_server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = url.into();
        self
    }

    /// Set the embedding model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the dimensionality reported for the configured model.
    pub fn with_dimensions(mut self, dims: usize) -> Self {
        self.dimensions = dims;
        self
    }
}

// ── Ollama API request/response types ──────────────────────────────

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    options: ChatOptions,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Extract the Ollama error message from a non-success response body.
fn error_detail(body: String) -> String {
    serde_json::from_str::<ErrorResponse>(&body).map(|e| e.error).unwrap_or(body)
}

/// Map memory roles onto the Ollama chat wire format.
///
/// Retrieved context rides as `assistant` turns, so the model treats the
/// documents as prior conversation ahead of the question.
fn wire_role(role: Role) -> &'static str {
    match role {
        Role::Context | Role::Assistant => "assistant",
        Role::User => "user",
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        debug!(provider = "ollama", model = %self.model, text_len = text.len(), "embedding text");

        let request_body = EmbeddingRequest { model: &self.model, prompt: text };
        let response = self
            .client
            .post(format!("{}/api/embeddings", self.server_url))
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = "ollama", error = %e, "embedding request failed");
                RagError::EmbeddingUnavailable {
                    provider: "ollama".into(),
                    message: format!("request failed: {e}"),
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = error_detail(response.text().await.unwrap_or_default());
            error!(provider = "ollama", %status, "embedding API error");
            return Err(RagError::EmbeddingUnavailable {
                provider: "ollama".into(),
                message: format!("API returned {status}: {detail}"),
            });
        }

        let embedding_response: EmbeddingResponse = response.json().await.map_err(|e| {
            error!(provider = "ollama", error = %e, "failed to parse embedding response");
            RagError::EmbeddingUnavailable {
                provider: "ollama".into(),
                message: format!("failed to parse response: {e}"),
            }
        })?;

        Ok(embedding_response.embedding)
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        // The embeddings endpoint takes one prompt per request; chunks are
        // independent, so run the requests concurrently.
        try_join_all(texts.iter().map(|text| self.embed(text))).await
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// A [`ChatModel`] backed by the Ollama chat API, with streaming disabled.
///
/// # Example
///
/// ```rust,ignore
/// use ragpipe::ollama::OllamaChatModel;
///
/// let model = OllamaChatModel::deepseek();
/// let answer = model.complete(memory.entries(), 0.8).await?;
/// ```
pub struct OllamaChatModel {
    client: reqwest::Client,
    server_url: String,
    model: String,
}

impl OllamaChatModel {
    /// Create a chat model for the default server.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            server_url: DEFAULT_SERVER_URL.into(),
            model: model.into(),
        }
    }

    /// A `deepseek-r1:1.5b` chat model on the default server.
    pub fn deepseek() -> Self {
        Self::new("deepseek-r1:1.5b")
    }

    /// A `llama2-chinese:13b` chat model on the default server.
    pub fn llama2_chinese() -> Self {
        Self::new("llama2-chinese:13b")
    }

    /// Set the Ollama server address.
    pub fn with_server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = url.into();
        self
    }
}

#[async_trait]
impl ChatModel for OllamaChatModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, messages: &[Message], temperature: f32) -> Result<String> {
        debug!(
            model = %self.model,
            message_count = messages.len(),
            temperature,
            "requesting chat completion"
        );

        let request_body = ChatRequest {
            model: &self.model,
            messages: messages
                .iter()
                .map(|m| ChatMessage { role: wire_role(m.role), content: &m.content })
                .collect(),
            stream: false,
            options: ChatOptions { temperature },
        };

        let response = self
            .client
            .post(format!("{}/api/chat", self.server_url))
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(model = %self.model, error = %e, "chat request failed");
                RagError::LlmUnavailable {
                    model: self.model.clone(),
                    message: format!("request failed: {e}"),
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = error_detail(response.text().await.unwrap_or_default());
            error!(model = %self.model, %status, "chat API error");
            return Err(RagError::LlmUnavailable {
                model: self.model.clone(),
                message: format!("API returned {status}: {detail}"),
            });
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            error!(model = %self.model, error = %e, "failed to parse chat response");
            RagError::LlmUnavailable {
                model: self.model.clone(),
                message: format!("failed to parse response: {e}"),
            }
        })?;

        Ok(chat_response.message.content)
    }
}
