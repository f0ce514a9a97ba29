//! Threshold, top-k, ordering, and failure-path behavior of the retriever.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ragpipe::document::{Record, RetrievalResult};
use ragpipe::{
    EmbeddingProvider, InMemoryVectorStore, RagError, Result, RetrievalOptions, Retriever,
    VectorStore,
};

/// Deterministic embedder derived from a text hash, normalized.
struct HashEmbedder;

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let hash = text.bytes().fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
        let mut v = vec![0.0f32; 16];
        for (i, x) in v.iter_mut().enumerate() {
            *x = ((hash.wrapping_add(i as u64)) as f32).sin();
        }
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        v.iter_mut().for_each(|x| *x /= norm);
        Ok(v)
    }

    fn dimensions(&self) -> usize {
        16
    }
}

/// An embedder that always fails.
struct BrokenEmbedder;

#[async_trait]
impl EmbeddingProvider for BrokenEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(RagError::EmbeddingUnavailable {
            provider: "mock".into(),
            message: "connection refused".into(),
        })
    }

    fn dimensions(&self) -> usize {
        16
    }
}

/// A store that answers every query with a fixed, descending-score list.
struct ScriptedStore {
    results: Vec<RetrievalResult>,
}

impl ScriptedStore {
    fn with_scores(scores: &[f32]) -> Self {
        Self {
            results: scores
                .iter()
                .enumerate()
                .map(|(i, &score)| RetrievalResult { text: format!("chunk {i}"), score })
                .collect(),
        }
    }
}

#[async_trait]
impl VectorStore for ScriptedStore {
    async fn insert(&self, records: Vec<Record>) -> Result<Vec<String>> {
        Ok(records.iter().map(|_| "id".to_string()).collect())
    }

    async fn query(&self, _vector: &[f32], limit: usize) -> Result<Vec<RetrievalResult>> {
        Ok(self.results.iter().take(limit).cloned().collect())
    }
}

/// A store that always fails.
struct BrokenStore;

#[async_trait]
impl VectorStore for BrokenStore {
    async fn insert(&self, _records: Vec<Record>) -> Result<Vec<String>> {
        Err(RagError::StoreUnavailable { backend: "mock".into(), message: "down".into() })
    }

    async fn query(&self, _vector: &[f32], _limit: usize) -> Result<Vec<RetrievalResult>> {
        Err(RagError::StoreUnavailable { backend: "mock".into(), message: "down".into() })
    }
}

/// A store whose queries hang longer than any reasonable deadline.
struct SlowStore;

#[async_trait]
impl VectorStore for SlowStore {
    async fn insert(&self, _records: Vec<Record>) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    async fn query(&self, _vector: &[f32], _limit: usize) -> Result<Vec<RetrievalResult>> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(Vec::new())
    }
}

const TEN_SCORES: [f32; 10] = [0.95, 0.90, 0.85, 0.70, 0.65, 0.60, 0.55, 0.50, 0.45, 0.40];

#[tokio::test]
async fn threshold_and_top_k_select_the_two_best() {
    let retriever =
        Retriever::new(Arc::new(HashEmbedder), Arc::new(ScriptedStore::with_scores(&TEN_SCORES)));
    let options = RetrievalOptions { top_k: 2, score_threshold: 0.80, deadline: None };

    let results = retriever.retrieve("query", &options).await.unwrap();
    let scores: Vec<f32> = results.iter().map(|r| r.score).collect();
    assert_eq!(scores, [0.95, 0.90]);
}

#[tokio::test]
async fn threshold_filters_below_even_when_top_k_allows_more() {
    let retriever =
        Retriever::new(Arc::new(HashEmbedder), Arc::new(ScriptedStore::with_scores(&TEN_SCORES)));
    let options = RetrievalOptions { top_k: 5, score_threshold: 0.80, deadline: None };

    let results = retriever.retrieve("query", &options).await.unwrap();
    let scores: Vec<f32> = results.iter().map(|r| r.score).collect();
    assert_eq!(scores, [0.95, 0.90, 0.85]);
    for result in &results {
        assert!(result.score >= options.score_threshold);
    }
}

#[tokio::test]
async fn no_candidate_above_threshold_is_empty_not_error() {
    let retriever = Retriever::new(
        Arc::new(HashEmbedder),
        Arc::new(ScriptedStore::with_scores(&[0.30, 0.20, 0.10])),
    );
    let options = RetrievalOptions { top_k: 5, score_threshold: 0.80, deadline: None };

    let results = retriever.retrieve("query", &options).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn equal_scores_preserve_store_order() {
    let store = Arc::new(InMemoryVectorStore::new());
    let vector = HashEmbedder.embed("the query").await.unwrap();
    let records: Vec<Record> = ["first", "second", "third"]
        .iter()
        .map(|text| Record {
            vector: vector.clone(),
            text: text.to_string(),
            metadata: Default::default(),
        })
        .collect();
    store.insert(records).await.unwrap();

    let retriever = Retriever::new(Arc::new(HashEmbedder), store);
    let options = RetrievalOptions { top_k: 3, score_threshold: 0.5, deadline: None };
    let results = retriever.retrieve("the query", &options).await.unwrap();

    let texts: Vec<&str> = results.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(texts, ["first", "second", "third"]);
}

#[tokio::test]
async fn embedding_failure_surfaces_as_retrieval_unavailable() {
    let retriever =
        Retriever::new(Arc::new(BrokenEmbedder), Arc::new(ScriptedStore::with_scores(&[0.9])));
    let err = retriever.retrieve("query", &RetrievalOptions::default()).await.unwrap_err();
    assert!(matches!(err, RagError::RetrievalUnavailable(_)), "got {err:?}");
}

#[tokio::test]
async fn store_failure_surfaces_as_retrieval_unavailable() {
    let retriever = Retriever::new(Arc::new(HashEmbedder), Arc::new(BrokenStore));
    let err = retriever.retrieve("query", &RetrievalOptions::default()).await.unwrap_err();
    assert!(matches!(err, RagError::RetrievalUnavailable(_)), "got {err:?}");
}

#[tokio::test]
async fn out_of_range_options_are_rejected() {
    let retriever =
        Retriever::new(Arc::new(HashEmbedder), Arc::new(ScriptedStore::with_scores(&[0.9])));

    let zero_k = RetrievalOptions { top_k: 0, ..Default::default() };
    assert!(matches!(
        retriever.retrieve("q", &zero_k).await.unwrap_err(),
        RagError::InvalidConfig(_)
    ));

    let bad_threshold = RetrievalOptions { score_threshold: 1.5, ..Default::default() };
    assert!(matches!(
        retriever.retrieve("q", &bad_threshold).await.unwrap_err(),
        RagError::InvalidConfig(_)
    ));
}

#[tokio::test(start_paused = true)]
async fn elapsed_deadline_cancels_the_query() {
    let retriever = Retriever::new(Arc::new(HashEmbedder), Arc::new(SlowStore));
    let options = RetrievalOptions {
        deadline: Some(Duration::from_millis(50)),
        ..Default::default()
    };

    let err = retriever.retrieve("query", &options).await.unwrap_err();
    assert!(matches!(err, RagError::Cancelled), "got {err:?}");
}
