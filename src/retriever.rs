//! Similarity retrieval with a score threshold and a result cap.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error};

use crate::deadline::with_deadline;
use crate::document::RetrievalResult;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

/// Per-call retrieval parameters.
///
/// The defaults (top 5 candidates at a 0.80 score threshold) match the
/// pipeline defaults in [`RagConfig`](crate::RagConfig); both knobs are
/// tunable per call.
#[derive(Debug, Clone)]
pub struct RetrievalOptions {
    /// Maximum number of results to return. Must be greater than zero.
    pub top_k: usize,
    /// Minimum similarity score a candidate must meet, in `[0, 1]`.
    pub score_threshold: f32,
    /// Optional deadline for the embedding call plus the store query.
    pub deadline: Option<Duration>,
}

impl Default for RetrievalOptions {
    fn default() -> Self {
        Self { top_k: 5, score_threshold: 0.80, deadline: None }
    }
}

impl RetrievalOptions {
    fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(RagError::InvalidConfig("top_k must be greater than zero".into()));
        }
        if !(0.0..=1.0).contains(&self.score_threshold) {
            return Err(RagError::InvalidConfig(format!(
                "score_threshold ({}) must be within [0, 1]",
                self.score_threshold
            )));
        }
        Ok(())
    }
}

/// Retrieves stored chunks relevant to a query.
///
/// Wraps the embedding and vector store gateways: the query is embedded,
/// the store is asked for `top_k` candidates, candidates below the score
/// threshold are discarded, and the remainder is truncated to `top_k` in
/// descending-score order. Equal scores keep the store's insertion order.
pub struct Retriever {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
}

impl Retriever {
    /// Create a retriever over the given gateways.
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, store: Arc<dyn VectorStore>) -> Self {
        Self { embedder, store }
    }

    /// Retrieve chunks relevant to `query`.
    ///
    /// Returns an empty sequence (not an error) when no candidate clears
    /// the threshold.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::RetrievalUnavailable`] if the embedding call or
    /// the store query fails; neither is retried here.
    /// Returns [`RagError::Cancelled`] when the deadline elapses, and
    /// [`RagError::InvalidConfig`] for out-of-range options.
    pub async fn retrieve(
        &self,
        query: &str,
        options: &RetrievalOptions,
    ) -> Result<Vec<RetrievalResult>> {
        options.validate()?;

        let candidates = with_deadline(options.deadline, async {
            let vector = self.embedder.embed(query).await.map_err(|e| {
                error!(error = %e, "query embedding failed");
                RagError::RetrievalUnavailable(format!("query embedding failed: {e}"))
            })?;

            self.store.query(&vector, options.top_k).await.map_err(|e| {
                error!(error = %e, "vector store query failed");
                RagError::RetrievalUnavailable(format!("store query failed: {e}"))
            })
        })
        .await?;

        let threshold = options.score_threshold;
        let mut results: Vec<RetrievalResult> =
            candidates.into_iter().filter(|r| r.score >= threshold).collect();
        results.truncate(options.top_k);

        debug!(
            result_count = results.len(),
            top_k = options.top_k,
            score_threshold = threshold,
            "retrieval completed"
        );
        Ok(results)
    }
}
