//! Per-paper scoped retrieval with same-paper merge.
//!
//! Once a query has identified *which* papers matter, [`RetrieverCache`]
//! re-retrieves at finer grain *within* each paper. Each paper gets a
//! lazily-built [`EmbeddingIndex`] over just its own chunks, cached under
//! the title. Multiple hits from one paper are merged into a single
//! passage so downstream summarization sees at most one passage per paper.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;

use tracing::{debug, info};

use crate::chunking::Chunker;
use crate::config::QueryOptions;
use crate::document::{Paper, SearchResult};
use crate::embedding::EmbeddingProvider;
use crate::error::Result;
use crate::index::EmbeddingIndex;

/// Separator between merged passage bodies.
const MERGE_SEPARATOR: &str = "\n\n";

/// A cache of per-paper scoped retrievers.
///
/// Unbounded by default: retrievers live for the session. With
/// [`with_capacity`](RetrieverCache::with_capacity) the cache holds at most
/// `n` retrievers and evicts the least recently used one.
pub struct RetrieverCache {
    provider: Arc<dyn EmbeddingProvider>,
    chunker: Arc<dyn Chunker>,
    retrievers: HashMap<String, EmbeddingIndex>,
    recency: Vec<String>,
    capacity: Option<NonZeroUsize>,
}

impl RetrieverCache {
    /// Create an unbounded cache that chunks and embeds like the caller's
    /// collection.
    pub fn new(provider: Arc<dyn EmbeddingProvider>, chunker: Arc<dyn Chunker>) -> Self {
        Self { provider, chunker, retrievers: HashMap::new(), recency: Vec::new(), capacity: None }
    }

    /// Bound the cache to `capacity` scoped retrievers with LRU eviction.
    pub fn with_capacity(mut self, capacity: NonZeroUsize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Number of scoped retrievers currently cached.
    pub fn len(&self) -> usize {
        self.retrievers.len()
    }

    /// Whether the cache holds no retrievers.
    pub fn is_empty(&self) -> bool {
        self.retrievers.is_empty()
    }

    /// Whether a retriever for `title` is cached.
    pub fn contains(&self, title: &str) -> bool {
        self.retrievers.contains_key(title)
    }

    /// Retrieve passages from within one paper.
    ///
    /// On first call for a title, builds the scoped retriever by re-chunking
    /// the paper the same way the collection did and indexing the chunks;
    /// later calls reuse it. The search honors the caller's options
    /// unchanged (same adaptive `k`, same strict threshold).
    ///
    /// # Errors
    ///
    /// Propagates embedding and store errors from index construction or
    /// search.
    pub async fn retrieve(
        &mut self,
        paper: &Paper,
        options: &QueryOptions,
    ) -> Result<Vec<SearchResult>> {
        if self.retrievers.contains_key(&paper.title) {
            debug!(title = %paper.title, "scoped retriever already cached");
            self.touch(&paper.title);
            if let Some(index) = self.retrievers.get(&paper.title) {
                return index.search(options).await;
            }
        }

        info!(title = %paper.title, "building scoped retriever");
        let mut index = EmbeddingIndex::in_memory(Arc::clone(&self.provider));
        index.add(self.chunker.chunk(paper)).await?;
        let results = index.search(options).await?;
        self.insert(paper.title.clone(), index);
        Ok(results)
    }

    /// Merge same-paper hits into a single passage.
    ///
    /// - no results → `None`
    /// - one result → that result unchanged
    /// - several → one synthetic result: texts joined by a blank line in
    ///   result order, keeping the first (highest-ranked) result's score
    ///   and chunk identity.
    pub fn merge(results: Vec<SearchResult>) -> Option<SearchResult> {
        let mut results = results.into_iter();
        let mut merged = results.next()?;

        let mut text = merged.chunk.text;
        for result in results {
            text.push_str(MERGE_SEPARATOR);
            text.push_str(&result.chunk.text);
        }
        merged.chunk.text = text;
        Some(merged)
    }

    fn insert(&mut self, title: String, index: EmbeddingIndex) {
        if let Some(capacity) = self.capacity {
            while self.retrievers.len() >= capacity.get() {
                // Oldest entry is at the front of the recency list.
                let evicted = self.recency.remove(0);
                self.retrievers.remove(&evicted);
                info!(title = %evicted, "evicted scoped retriever");
            }
        }
        self.retrievers.insert(title.clone(), index);
        self.recency.push(title);
    }

    fn touch(&mut self, title: &str) {
        if let Some(pos) = self.recency.iter().position(|t| t == title) {
            let title = self.recency.remove(pos);
            self.recency.push(title);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap as StdHashMap;

    use super::*;
    use crate::document::Chunk;

    fn result(id: &str, text: &str, score: f32) -> SearchResult {
        SearchResult {
            chunk: Chunk {
                id: id.into(),
                text: text.into(),
                embedding: vec![1.0],
                metadata: StdHashMap::new(),
            },
            score,
        }
    }

    #[test]
    fn merge_of_none_is_none() {
        assert!(RetrieverCache::merge(Vec::new()).is_none());
    }

    #[test]
    fn merge_of_one_is_unchanged() {
        let merged = RetrieverCache::merge(vec![result("a", "body", 0.8)]).unwrap();
        assert_eq!(merged.chunk.text, "body");
        assert_eq!(merged.score, 0.8);
    }

    #[test]
    fn merge_concatenates_in_order_and_keeps_first_score() {
        let merged = RetrieverCache::merge(vec![
            result("a", "first", 0.9),
            result("b", "second", 0.7),
            result("c", "third", 0.6),
        ])
        .unwrap();
        assert_eq!(merged.chunk.text, "first\n\nsecond\n\nthird");
        assert_eq!(merged.score, 0.9);
        assert_eq!(merged.chunk.id, "a");
    }
}
