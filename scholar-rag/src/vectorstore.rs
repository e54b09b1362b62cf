//! The vector store seam: chunk storage plus similarity search.

use async_trait::async_trait;

use crate::document::{Chunk, SearchResult};
use crate::error::Result;

/// Storage for embedded chunks with cosine-style similarity search.
///
/// One store backs exactly one [`EmbeddingIndex`](crate::index::EmbeddingIndex);
/// scoped per-paper retrievers each get their own. Scores are relevance
/// values in `[0, 1]`, higher meaning closer.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Store chunks, replacing any stored chunk that shares an ID.
    ///
    /// Every chunk must carry an embedding; a batch with a bare chunk is
    /// rejected whole.
    async fn upsert(&self, chunks: &[Chunk]) -> Result<()>;

    /// The `top_k` nearest chunks to `embedding`, best first.
    ///
    /// Only candidates scoring *strictly above* `min_score` are returned;
    /// a tie at the threshold is excluded.
    async fn search(
        &self,
        embedding: &[f32],
        top_k: usize,
        min_score: f32,
    ) -> Result<Vec<SearchResult>>;
}
