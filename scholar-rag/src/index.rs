//! Embedding-backed similarity index with adaptive result sizing.
//!
//! [`EmbeddingIndex`] pairs an [`EmbeddingProvider`] with a [`VectorStore`]
//! and keeps the running count of chunks it has indexed. When a search does
//! not name a result count, the index derives one from the corpus size:
//! `floor(sqrt(N))`, so the candidate pool grows with the corpus but
//! sub-linearly.

use std::sync::Arc;

use tracing::{debug, error, info};
use uuid::Uuid;

use crate::config::QueryOptions;
use crate::document::{Chunk, SearchResult};
use crate::embedding::EmbeddingProvider;
use crate::error::Result;
use crate::inmemory::InMemoryVectorStore;
use crate::vectorstore::VectorStore;

/// A similarity index over chunks.
///
/// Owns its chunk count: independent indexes never share state, so multiple
/// collections (and the per-paper scoped retrievers) coexist safely.
pub struct EmbeddingIndex {
    id: Uuid,
    provider: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    chunk_count: usize,
}

impl EmbeddingIndex {
    /// Create an index over the given provider and store.
    pub fn new(provider: Arc<dyn EmbeddingProvider>, store: Arc<dyn VectorStore>) -> Self {
        let id = Uuid::new_v4();
        debug!(index = %id, "initiating embedding index");
        Self { id, provider, store, chunk_count: 0 }
    }

    /// Create an index backed by a fresh [`InMemoryVectorStore`].
    pub fn in_memory(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self::new(provider, Arc::new(InMemoryVectorStore::new()))
    }

    /// Number of chunks added so far.
    pub fn chunk_count(&self) -> usize {
        self.chunk_count
    }

    /// The embedding provider this index embeds with.
    pub fn provider(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.provider
    }

    /// Embed and store a batch of chunks.
    ///
    /// The whole batch is embedded before anything is stored, so a provider
    /// error leaves the index untouched; the chunk count only grows after a
    /// successful upsert.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Embedding`] or [`RagError::VectorStore`] when
    /// the corresponding backend fails. No retry is performed here.
    pub async fn add(&mut self, mut chunks: Vec<Chunk>) -> Result<()> {
        if chunks.is_empty() {
            return Ok(());
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let embeddings = self.provider.embed_batch(&texts).await.map_err(|e| {
            error!(index = %self.id, error = %e, "embedding failed during add");
            e
        })?;

        for (chunk, embedding) in chunks.iter_mut().zip(embeddings) {
            chunk.embedding = embedding;
        }

        self.store.upsert(&chunks).await?;
        self.chunk_count += chunks.len();
        info!(index = %self.id, added = chunks.len(), total = self.chunk_count, "indexed chunks");
        Ok(())
    }

    /// Search for chunks relevant to the query.
    ///
    /// Results are ordered by descending score; candidates scoring at or
    /// below `options.score_threshold` are excluded. An empty result is a
    /// valid outcome. When `options.k` is `None` the index requests
    /// `floor(sqrt(chunk_count))` candidates.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Embedding`] or [`RagError::VectorStore`] when
    /// the corresponding backend fails.
    pub async fn search(&self, options: &QueryOptions) -> Result<Vec<SearchResult>> {
        let k = match options.k {
            Some(k) => k,
            None => {
                let k = (self.chunk_count as f64).sqrt().floor() as usize;
                debug!(
                    index = %self.id,
                    k,
                    chunk_count = self.chunk_count,
                    "derived adaptive result count"
                );
                k
            }
        };
        if k == 0 {
            return Ok(Vec::new());
        }

        let query_embedding = self.provider.embed(&options.query).await.map_err(|e| {
            error!(index = %self.id, error = %e, "query embedding failed");
            e
        })?;

        let results =
            self.store.search(&query_embedding, k, options.score_threshold).await?;
        debug!(index = %self.id, found = results.len(), "search completed");
        Ok(results)
    }
}

impl std::fmt::Debug for EmbeddingIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingIndex")
            .field("id", &self.id)
            .field("chunk_count", &self.chunk_count)
            .finish_non_exhaustive()
    }
}
