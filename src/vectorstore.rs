//! Vector store gateway trait for persisting and searching embeddings.

use async_trait::async_trait;

use crate::document::{Record, RetrievalResult};
use crate::error::Result;

/// A storage gateway that persists embedded records and answers
/// nearest-neighbor queries.
///
/// The store owns persistence, indexing, and overwrite policy; callers only
/// see opaque record ids. Implementations must be safe for concurrent
/// inserts under distinct ids, and a query issued after a confirmed insert
/// must observe that insert. Failures surface as
/// [`RagError::StoreUnavailable`](crate::RagError::StoreUnavailable).
///
/// # Example
///
/// ```rust,ignore
/// use ragpipe::{InMemoryVectorStore, VectorStore};
///
/// let store = InMemoryVectorStore::new();
/// let ids = store.insert(records).await?;
/// let hits = store.query(&query_embedding, 5).await?;
/// ```
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Persist records and return their assigned ids, in input order.
    async fn insert(&self, records: Vec<Record>) -> Result<Vec<String>>;

    /// Return up to `limit` records most similar to `vector`, ordered by
    /// descending similarity score.
    async fn query(&self, vector: &[f32], limit: usize) -> Result<Vec<RetrievalResult>>;
}
