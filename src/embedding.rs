//! Embedding gateway trait for converting text to vectors.

use async_trait::async_trait;

use crate::error::Result;

/// A gateway that converts text into fixed-dimension embedding vectors.
///
/// Implementations wrap an external embedding service behind a unified
/// async interface and report failures as
/// [`RagError::EmbeddingUnavailable`](crate::RagError::EmbeddingUnavailable).
/// The default [`embed_batch`](EmbeddingProvider::embed_batch) calls
/// [`embed`](EmbeddingProvider::embed) sequentially; backends that can run
/// requests concurrently or batch natively should override it.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding vector for a single text input.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embedding vectors for a batch of text inputs.
    ///
    /// Inputs are independent, so overriding implementations may process
    /// them concurrently; output order must match input order.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// Return the dimensionality of embeddings produced by this gateway.
    fn dimensions(&self) -> usize;
}
