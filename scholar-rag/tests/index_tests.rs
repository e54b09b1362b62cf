//! Tests for the embedding index: atomic adds, retrievability, adaptive k.

mod common;

use std::collections::HashMap;
use std::sync::Arc;

use common::{scenario_markers, FailingEmbedding, MarkerEmbedding};
use scholar_rag::config::QueryOptions;
use scholar_rag::document::Chunk;
use scholar_rag::error::RagError;
use scholar_rag::index::EmbeddingIndex;

fn chunk(id: &str, text: &str) -> Chunk {
    Chunk { id: id.into(), text: text.into(), embedding: Vec::new(), metadata: HashMap::new() }
}

#[tokio::test]
async fn every_added_chunk_is_retrievable() {
    let provider = Arc::new(MarkerEmbedding::new(scenario_markers()));
    let mut index = EmbeddingIndex::in_memory(provider);

    index
        .add(vec![chunk("c0", "ahi text"), chunk("c1", "amid text"), chunk("c2", "alow text")])
        .await
        .unwrap();
    assert_eq!(index.chunk_count(), 3);

    let options = QueryOptions::new("anything").with_k(3).with_score_threshold(0.0);
    let results = index.search(&options).await.unwrap();
    let mut ids: Vec<&str> = results.iter().map(|r| r.chunk.id.as_str()).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec!["c0", "c1", "c2"]);
}

#[tokio::test]
async fn empty_batch_is_a_no_op() {
    let provider = Arc::new(MarkerEmbedding::new(scenario_markers()));
    let mut index = EmbeddingIndex::in_memory(provider.clone());

    index.add(Vec::new()).await.unwrap();
    assert_eq!(index.chunk_count(), 0);
    assert_eq!(provider.embed_count(), 0);
}

#[tokio::test]
async fn provider_failure_does_not_grow_the_count() {
    let mut index = EmbeddingIndex::in_memory(Arc::new(FailingEmbedding));

    let err = index.add(vec![chunk("c0", "text")]).await.unwrap_err();
    assert!(matches!(err, RagError::Embedding { .. }));
    assert_eq!(index.chunk_count(), 0);
}

#[tokio::test]
async fn empty_index_with_adaptive_k_returns_nothing() {
    let provider = Arc::new(MarkerEmbedding::new(scenario_markers()));
    let index = EmbeddingIndex::in_memory(provider.clone());

    // floor(sqrt(0)) = 0 — nothing to request, and no embed call either.
    let results = index.search(&QueryOptions::new("X")).await.unwrap();
    assert!(results.is_empty());
    assert_eq!(provider.embed_count(), 0);
}

#[tokio::test]
async fn results_ordered_by_descending_score() {
    let provider = Arc::new(MarkerEmbedding::new(scenario_markers()));
    let mut index = EmbeddingIndex::in_memory(provider);

    index
        .add(vec![chunk("low", "alow text"), chunk("high", "ahi text"), chunk("mid", "amid text")])
        .await
        .unwrap();

    let options = QueryOptions::new("X").with_k(3).with_score_threshold(0.0);
    let results = index.search(&options).await.unwrap();
    let ids: Vec<&str> = results.iter().map(|r| r.chunk.id.as_str()).collect();
    assert_eq!(ids, vec!["high", "mid", "low"]);
}
