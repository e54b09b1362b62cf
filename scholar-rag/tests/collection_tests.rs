//! Integration tests for the paper collection: ingestion, deduplication,
//! adaptive result sizing, and failure behavior.

mod common;

use std::sync::Arc;

use common::{paper_a, paper_b, scenario_markers, FailingEmbedding, MarkerEmbedding, RecordingStore};
use scholar_rag::collection::PaperCollection;
use scholar_rag::config::{CollectionConfig, QueryOptions};
use scholar_rag::error::RagError;

fn scenario_collection(
    provider: Arc<MarkerEmbedding>,
    store: Arc<RecordingStore>,
) -> PaperCollection {
    PaperCollection::builder()
        .config(CollectionConfig::builder().chunk_size(30).build().unwrap())
        .embedding_provider(provider)
        .vector_store(store)
        .build()
        .unwrap()
}

#[tokio::test]
async fn add_grows_chunk_count_by_batch_size() {
    let provider = Arc::new(MarkerEmbedding::new(scenario_markers()));
    let store = Arc::new(RecordingStore::new());
    let mut collection = scenario_collection(provider, store);

    collection.add_paper(paper_a()).await.unwrap();
    assert_eq!(collection.len(), 1);
    assert_eq!(collection.chunk_count(), 3);

    collection.add_paper(paper_b()).await.unwrap();
    assert_eq!(collection.chunk_count(), 6);
}

#[tokio::test]
async fn added_chunks_are_retrievable_with_permissive_threshold() {
    let provider = Arc::new(MarkerEmbedding::new(scenario_markers()));
    let store = Arc::new(RecordingStore::new());
    let mut collection = scenario_collection(provider, store);
    collection.add_paper(paper_a()).await.unwrap();

    let options = QueryOptions::new("X").with_k(3).with_score_threshold(0.0);
    let found = collection.query(&options).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].title, "A");
}

#[tokio::test]
async fn duplicate_title_is_idempotent() {
    let provider = Arc::new(MarkerEmbedding::new(scenario_markers()));
    let store = Arc::new(RecordingStore::new());
    let mut collection = scenario_collection(provider, store);

    collection.add_paper(paper_a()).await.unwrap();
    let chunks_before = collection.chunk_count();

    collection.add_paper(paper_a()).await.unwrap();
    assert_eq!(collection.len(), 1);
    assert_eq!(collection.chunk_count(), chunks_before);
}

#[tokio::test]
async fn provider_failure_leaves_collection_unchanged() {
    let mut collection = PaperCollection::builder()
        .config(CollectionConfig::builder().chunk_size(30).build().unwrap())
        .embedding_provider(Arc::new(FailingEmbedding))
        .build()
        .unwrap();

    let err = collection.add_paper(paper_a()).await.unwrap_err();
    assert!(matches!(err, RagError::Embedding { .. }));
    assert_eq!(collection.len(), 0);
    assert_eq!(collection.chunk_count(), 0);
}

#[tokio::test]
async fn empty_collection_query_errors_without_touching_backends() {
    let provider = Arc::new(MarkerEmbedding::new(scenario_markers()));
    let store = Arc::new(RecordingStore::new());
    let collection = scenario_collection(Arc::clone(&provider), Arc::clone(&store));

    let err = collection.query(&QueryOptions::new("X")).await.unwrap_err();
    assert!(matches!(err, RagError::EmptyCollection));
    assert_eq!(provider.embed_count(), 0);
    assert!(store.requested().is_empty());
}

#[tokio::test]
async fn omitted_k_requests_floor_sqrt_of_chunk_count() {
    let provider = Arc::new(MarkerEmbedding::new(scenario_markers()));
    let store = Arc::new(RecordingStore::new());
    let mut collection = scenario_collection(provider, Arc::clone(&store));

    collection.add_paper(paper_a()).await.unwrap();
    collection.add_paper(paper_b()).await.unwrap();
    assert_eq!(collection.chunk_count(), 6);

    let options = QueryOptions::new("X").with_score_threshold(0.0);
    collection.query(&options).await.unwrap();

    // floor(sqrt(6)) = 2
    assert_eq!(store.requested(), vec![2]);
}

#[tokio::test]
async fn query_deduplicates_papers_in_score_order() {
    let provider = Arc::new(MarkerEmbedding::new(scenario_markers()));
    let store = Arc::new(RecordingStore::new());
    let mut collection = scenario_collection(provider, store);

    collection.add_paper(paper_b()).await.unwrap();
    collection.add_paper(paper_a()).await.unwrap();

    // Threshold below every marker weight: hits from both papers, A first.
    let options = QueryOptions::new("X").with_k(6).with_score_threshold(0.05);
    let found = collection.query(&options).await.unwrap();
    let titles: Vec<&str> = found.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["A", "B"]);
}

#[tokio::test]
async fn without_embedding_registers_but_does_not_index() {
    let provider = Arc::new(MarkerEmbedding::new(scenario_markers()));
    let mut collection = PaperCollection::builder()
        .config(CollectionConfig::builder().chunk_size(30).build().unwrap())
        .embedding_provider(provider.clone())
        .without_embedding()
        .build()
        .unwrap();

    collection.add_paper(paper_a()).await.unwrap();
    assert_eq!(collection.len(), 1);
    assert_eq!(collection.chunk_count(), 0);
    assert_eq!(provider.embed_count(), 0);
}

#[tokio::test]
async fn bibliography_follows_insertion_order() {
    let provider = Arc::new(MarkerEmbedding::new(scenario_markers()));
    let store = Arc::new(RecordingStore::new());
    let mut collection = scenario_collection(provider, store);

    collection.add_paper(paper_b()).await.unwrap();
    collection.add_paper(paper_a()).await.unwrap();

    let bib = collection.bibliography();
    assert_eq!(bib.len(), 2);
    assert!(bib[0].contains("title={B}"));
    assert!(bib[1].contains("title={A}"));
}
