//! The embedding seam: text in, vectors out.

use async_trait::async_trait;

use crate::error::Result;

/// Turns text into a fixed-width vector, deterministically per text.
///
/// One provider instance serves a whole collection plus its scoped
/// retrievers, so queries and chunks always land in the same vector space.
/// Backends with a native batch endpoint should override
/// [`embed_batch`](EmbeddingProvider::embed_batch); the default just loops.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed several texts, one vector per input in input order.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.embed(text).await?);
        }
        Ok(vectors)
    }

    /// Width of the vectors this provider produces.
    fn dimensions(&self) -> usize;
}
