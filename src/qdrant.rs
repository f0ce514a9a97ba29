//! Qdrant vector store backend.
//!
//! This module is only available when the `qdrant` feature is enabled. It
//! provides [`QdrantVectorStore`], a [`VectorStore`] over the
//! [qdrant-client](https://docs.rs/qdrant-client) gRPC API with cosine
//! distance. One store maps to one Qdrant collection, named in
//! [`QdrantConfig`] and created on connect if missing.

use async_trait::async_trait;
use qdrant_client::qdrant::value::Kind;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, PointStruct, SearchPointsBuilder, UpsertPointsBuilder,
    Value as QdrantValue, VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant};
use tracing::debug;
use uuid::Uuid;

use crate::document::{Record, RetrievalResult};
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

/// Connection settings for a [`QdrantVectorStore`].
#[derive(Debug, Clone)]
pub struct QdrantConfig {
    /// Qdrant gRPC address.
    pub url: String,
    /// Collection holding this pipeline's records.
    pub collection: String,
    /// Vector dimensionality, matching the embedding provider.
    pub dimensions: usize,
}

impl QdrantConfig {
    /// Settings for a collection on a local Qdrant (`http://localhost:6334`).
    pub fn local(collection: impl Into<String>, dimensions: usize) -> Self {
        Self { url: "http://localhost:6334".into(), collection: collection.into(), dimensions }
    }
}

/// A [`VectorStore`] backed by [Qdrant](https://qdrant.tech/).
///
/// Upserts wait for write confirmation, so a query issued after a
/// successful insert observes it.
///
/// # Example
///
/// ```rust,ignore
/// use ragpipe::qdrant::{QdrantConfig, QdrantVectorStore};
///
/// let store = QdrantVectorStore::connect(QdrantConfig::local("docs", 768)).await?;
/// let ids = store.insert(records).await?;
/// let hits = store.query(&query_embedding, 5).await?;
/// ```
pub struct QdrantVectorStore {
    client: Qdrant,
    collection: String,
}

impl QdrantVectorStore {
    /// Connect to Qdrant and ensure the configured collection exists.
    pub async fn connect(config: QdrantConfig) -> Result<Self> {
        let client = Qdrant::from_url(&config.url).build().map_err(map_err)?;

        let collections = client.list_collections().await.map_err(map_err)?;
        let exists = collections.collections.iter().any(|c| c.name == config.collection);
        if exists {
            debug!(collection = %config.collection, "qdrant collection already exists");
        } else {
            client
                .create_collection(
                    CreateCollectionBuilder::new(&config.collection).vectors_config(
                        VectorParamsBuilder::new(config.dimensions as u64, Distance::Cosine),
                    ),
                )
                .await
                .map_err(map_err)?;
            debug!(
                collection = %config.collection,
                dimensions = config.dimensions,
                "created qdrant collection"
            );
        }

        Ok(Self { client, collection: config.collection })
    }

    /// Wrap an existing client, without touching collection state.
    pub fn from_client(client: Qdrant, collection: impl Into<String>) -> Self {
        Self { client, collection: collection.into() }
    }
}

fn map_err(e: qdrant_client::QdrantError) -> RagError {
    RagError::StoreUnavailable { backend: "qdrant".to_string(), message: e.to_string() }
}

/// Extract a string from a Qdrant payload value.
fn extract_string(value: &QdrantValue) -> Option<String> {
    match &value.kind {
        Some(Kind::StringValue(s)) => Some(s.clone()),
        _ => None,
    }
}

#[async_trait]
impl VectorStore for QdrantVectorStore {
    async fn insert(&self, records: Vec<Record>) -> Result<Vec<String>> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::with_capacity(records.len());
        let points: Vec<PointStruct> = records
            .into_iter()
            .map(|record| {
                let id = Uuid::new_v4().to_string();
                ids.push(id.clone());

                let mut payload_map = serde_json::Map::new();
                payload_map.insert("text".to_string(), serde_json::Value::String(record.text));
                let metadata_obj: serde_json::Map<String, serde_json::Value> = record
                    .metadata
                    .into_iter()
                    .map(|(k, v)| (k, serde_json::Value::String(v)))
                    .collect();
                payload_map.insert("metadata".to_string(), serde_json::Value::Object(metadata_obj));

                let payload =
                    Payload::try_from(serde_json::Value::Object(payload_map)).unwrap_or_default();

                PointStruct::new(id, record.vector, payload)
            })
            .collect();

        let count = points.len();
        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, points).wait(true))
            .await
            .map_err(map_err)?;

        debug!(collection = %self.collection, count, "upserted records to qdrant");
        Ok(ids)
    }

    async fn query(&self, vector: &[f32], limit: usize) -> Result<Vec<RetrievalResult>> {
        let response = self
            .client
            .search_points(
                SearchPointsBuilder::new(&self.collection, vector.to_vec(), limit as u64)
                    .with_payload(true),
            )
            .await
            .map_err(map_err)?;

        let results = response
            .result
            .into_iter()
            .map(|scored| RetrievalResult {
                text: scored.payload.get("text").and_then(extract_string).unwrap_or_default(),
                score: scored.score,
            })
            .collect();

        Ok(results)
    }
}
