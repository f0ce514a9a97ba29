//! In-memory vector store using cosine similarity.
//!
//! [`InMemoryVectorStore`] keeps records in insertion order behind a
//! `tokio::sync::RwLock`. It is suitable for development, testing, and
//! small corpora; queries scan every record.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::document::{Record, RetrievalResult};
use crate::error::Result;
use crate::vectorstore::VectorStore;

/// An in-memory [`VectorStore`] scoring candidates by cosine similarity.
///
/// Records live in a `Vec` in insertion order, and query sorting is stable,
/// so candidates with equal scores come back in the order they were stored.
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    records: RwLock<Vec<StoredRecord>>,
}

#[derive(Debug)]
struct StoredRecord {
    id: String,
    record: Record,
}

impl InMemoryVectorStore {
    /// Create a new empty in-memory vector store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently stored.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Look up a stored record by the id returned from
    /// [`insert`](VectorStore::insert).
    pub async fn get(&self, id: &str) -> Option<Record> {
        self.records.read().await.iter().find(|s| s.id == id).map(|s| s.record.clone())
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn insert(&self, records: Vec<Record>) -> Result<Vec<String>> {
        let mut store = self.records.write().await;
        let mut ids = Vec::with_capacity(records.len());
        for record in records {
            let id = Uuid::new_v4().to_string();
            ids.push(id.clone());
            store.push(StoredRecord { id, record });
        }
        Ok(ids)
    }

    async fn query(&self, vector: &[f32], limit: usize) -> Result<Vec<RetrievalResult>> {
        let store = self.records.read().await;
        let mut scored: Vec<RetrievalResult> = store
            .iter()
            .map(|stored| RetrievalResult {
                text: stored.record.text.clone(),
                score: cosine_similarity(&stored.record.vector, vector),
            })
            .collect();

        // Stable sort keeps insertion order between equal scores.
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);
        Ok(scored)
    }
}
