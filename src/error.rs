//! Error types for the `ragpipe` crate.

use thiserror::Error;

/// Errors that can occur in RAG operations.
///
/// Infrastructure failures (`EmbeddingUnavailable`, `StoreUnavailable`,
/// `LlmUnavailable`, `RetrievalUnavailable`, `GenerationFailed`) are
/// surfaced to the caller without internal retries; retrying the whole
/// pipeline call is safe. `InvalidConfig` means the caller must fix the
/// configuration before retrying.
#[derive(Debug, Error)]
pub enum RagError {
    /// Configuration parameters are inconsistent or out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The embedding gateway failed to produce a vector.
    #[error("embedding unavailable ({provider}): {message}")]
    EmbeddingUnavailable {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The vector store gateway failed an insert or query.
    #[error("vector store unavailable ({backend}): {message}")]
    StoreUnavailable {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// The language model gateway failed a completion call.
    #[error("llm unavailable ({model}): {message}")]
    LlmUnavailable {
        /// The model that produced the error.
        model: String,
        /// A description of the failure.
        message: String,
    },

    /// Retrieval failed because the embedding call or the store query failed.
    #[error("retrieval unavailable: {0}")]
    RetrievalUnavailable(String),

    /// Answer generation failed because the model gateway reported an error.
    #[error("answer generation failed: {0}")]
    GenerationFailed(String),

    /// The caller-supplied deadline elapsed before the gateway call finished.
    #[error("operation cancelled by caller deadline")]
    Cancelled,
}

/// A convenience result type for RAG operations.
pub type Result<T> = std::result::Result<T, RagError>;
