//! Property tests for in-memory vector store search ordering.

use std::collections::HashMap;

use proptest::prelude::*;
use ragpipe::document::Record;
use ragpipe::inmemory::InMemoryVectorStore;
use ragpipe::vectorstore::VectorStore;

/// Generate a non-zero L2-normalized embedding of the given dimension.
fn arb_normalized_embedding(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-1.0f32..1.0f32, dim).prop_filter_map(
        "non-zero embedding",
        |mut v| {
            let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
            if norm < 1e-8 {
                return None;
            }
            for val in &mut v {
                *val /= norm;
            }
            Some(v)
        },
    )
}

/// Generate a record with a normalized embedding.
fn arb_record(dim: usize) -> impl Strategy<Value = Record> {
    ("[a-z ]{5,30}", arb_normalized_embedding(dim)).prop_map(|(text, vector)| Record {
        vector,
        text,
        metadata: HashMap::new(),
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// For any set of stored records, querying returns results ordered by
    /// descending cosine similarity, bounded by the limit and by the number
    /// of stored records.
    #[test]
    fn results_ordered_descending_and_bounded_by_limit(
        records in proptest::collection::vec(arb_record(16), 1..20),
        query in arb_normalized_embedding(16),
        limit in 1usize..25,
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let (results, stored) = rt.block_on(async {
            let store = InMemoryVectorStore::new();
            let count = records.len();
            store.insert(records).await.unwrap();
            (store.query(&query, limit).await.unwrap(), count)
        });

        prop_assert!(results.len() <= limit);
        prop_assert!(results.len() <= stored);

        for window in results.windows(2) {
            prop_assert!(
                window[0].score >= window[1].score,
                "results not in descending order: {} < {}",
                window[0].score,
                window[1].score,
            );
        }
    }
}

#[tokio::test]
async fn equal_scores_keep_insertion_order() {
    let store = InMemoryVectorStore::new();
    let vector = vec![0.6f32, 0.8, 0.0];
    let records: Vec<Record> = ["first", "second", "third"]
        .iter()
        .map(|text| Record {
            vector: vector.clone(),
            text: text.to_string(),
            metadata: HashMap::new(),
        })
        .collect();
    store.insert(records).await.unwrap();

    let results = store.query(&vector, 3).await.unwrap();
    let texts: Vec<&str> = results.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(texts, ["first", "second", "third"]);
}

#[tokio::test]
async fn insert_returns_resolvable_ids() {
    let store = InMemoryVectorStore::new();
    let ids = store
        .insert(vec![Record {
            vector: vec![1.0, 0.0],
            text: "hello".into(),
            metadata: HashMap::from([("sequence_index".into(), "0".into())]),
        }])
        .await
        .unwrap();

    assert_eq!(ids.len(), 1);
    assert_eq!(store.len().await, 1);
    let record = store.get(&ids[0]).await.expect("record should resolve by id");
    assert_eq!(record.text, "hello");
}
