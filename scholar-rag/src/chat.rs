//! Chat facade over the retrieval pipeline.
//!
//! [`CorpusChat`] wires a [`PaperCollection`], a [`RetrieverCache`], and a
//! [`SummaryRouter`] into the full query flow: coarse paper retrieval →
//! per-paper scoped retrieval → same-paper merge → summarize or answer.

use std::sync::Arc;

use scholar_model::Llm;
use tracing::{info, warn};

use crate::cache::RetrieverCache;
use crate::collection::PaperCollection;
use crate::config::QueryOptions;
use crate::document::SearchResult;
use crate::error::Result;
use crate::router::SummaryRouter;

/// A chat session over a paper collection.
///
/// Owns the collection, the per-paper retriever cache, and the two model
/// tiers. All methods take `&mut self`: retrieval lazily extends the cache.
pub struct CorpusChat {
    collection: PaperCollection,
    cache: RetrieverCache,
    router: SummaryRouter,
    large: Arc<dyn Llm>,
}

impl CorpusChat {
    /// Create a chat session over `collection` with the two model tiers.
    ///
    /// The cache chunks and embeds exactly the way the collection does, so
    /// scoped retrievers see the same chunk boundaries.
    pub fn new(collection: PaperCollection, small: Arc<dyn Llm>, large: Arc<dyn Llm>) -> Self {
        let cache = RetrieverCache::new(
            Arc::clone(collection.embedding_provider()),
            Arc::clone(collection.chunker()),
        );
        let router = SummaryRouter::new(small, Arc::clone(&large));
        Self { collection, cache, router, large }
    }

    /// The underlying collection.
    pub fn collection(&self) -> &PaperCollection {
        &self.collection
    }

    /// Mutable access to the underlying collection (for further ingestion).
    pub fn collection_mut(&mut self) -> &mut PaperCollection {
        &mut self.collection
    }

    /// The per-paper retriever cache.
    pub fn cache(&self) -> &RetrieverCache {
        &self.cache
    }

    /// Replace the retriever cache (e.g. to bound it with a capacity).
    pub fn with_cache(mut self, cache: RetrieverCache) -> Self {
        self.cache = cache;
        self
    }

    /// Override the router (e.g. to change the temperature).
    pub fn with_router(mut self, router: SummaryRouter) -> Self {
        self.router = router;
        self
    }

    /// Aggregate the best passages for a query, one per relevant paper.
    ///
    /// Papers come back in the collection's score order; each paper
    /// contributes its merged top passage. A paper whose scoped retrieval
    /// clears nothing above the threshold contributes nothing. The
    /// aggregate is not re-sorted across papers.
    ///
    /// # Errors
    ///
    /// Propagates collection, embedding, and store errors.
    pub async fn source(&mut self, options: &QueryOptions) -> Result<Vec<SearchResult>> {
        let papers = self.collection.query(options).await?;

        let mut aggregated = Vec::new();
        for paper in &papers {
            let results = self.cache.retrieve(paper, options).await?;
            let hits = results.len();
            if let Some(merged) = RetrieverCache::merge(results) {
                if hits > 1 {
                    info!(title = %paper.title, hits, "merged passages into one source");
                }
                aggregated.push(merged);
            }
        }
        Ok(aggregated)
    }

    /// Find and summarize related passages for a query.
    ///
    /// Each returned result carries a one-sentence summary and its score in
    /// the chunk metadata.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RagError::NoSources`] when nothing relevant was
    /// found; model errors abort the batch.
    pub async fn source_and_summarize(
        &mut self,
        options: &QueryOptions,
    ) -> Result<Vec<SearchResult>> {
        info!(query = %options.query, "finding related works");
        let sources = self.source(options).await?;
        self.router.summarize_all(&options.query, sources).await
    }

    /// Answer a free-form query grounded in the aggregated sources.
    ///
    /// Builds a context prompt from every retrieved passage and asks the
    /// large-context model. Returns the answer together with the sources it
    /// was grounded in. An empty source list is allowed here; the model
    /// answers unaided, with a warning logged.
    ///
    /// # Errors
    ///
    /// Propagates retrieval and model errors.
    pub async fn answer(&mut self, options: &QueryOptions) -> Result<(String, Vec<SearchResult>)> {
        info!(query = %options.query, "answering query with paper context");
        let sources = self.source(options).await?;
        if sources.is_empty() {
            warn!(query = %options.query, "no sources found, answering without context");
        }

        let mut prompt = format!(
            "{} with the following paper contents as context for your reference:\n",
            options.query
        );
        for source in &sources {
            prompt.push_str(&source.chunk.text);
            prompt.push('\n');
        }

        let answer = self.large.query(&prompt, 0.0).await?;
        Ok((answer, sources))
    }
}
