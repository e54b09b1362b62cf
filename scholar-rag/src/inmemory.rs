//! In-memory vector store.
//!
//! [`InMemoryVectorStore`] keeps chunks in a `HashMap` behind a
//! `tokio::sync::RwLock` and scores candidates by cosine similarity. It is
//! the default backend for collections and for per-paper scoped
//! retrievers, which are small and short-lived.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::{Chunk, SearchResult};
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

/// A cosine-similarity vector store held entirely in memory.
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    entries: RwLock<HashMap<String, Chunk>>,
}

impl InMemoryVectorStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of chunks currently stored.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the store holds no chunks.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

/// Cosine similarity of two vectors; 0.0 when either has zero magnitude.
fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let (mut dot, mut aa, mut bb) = (0.0f32, 0.0f32, 0.0f32);
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        aa += x * x;
        bb += y * y;
    }
    let denom = aa.sqrt() * bb.sqrt();
    if denom == 0.0 { 0.0 } else { dot / denom }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn upsert(&self, chunks: &[Chunk]) -> Result<()> {
        // Validate the whole batch before touching the map so a bad chunk
        // never leaves partial state behind.
        if let Some(bare) = chunks.iter().find(|c| c.embedding.is_empty()) {
            return Err(RagError::VectorStore {
                backend: "InMemory".to_string(),
                message: format!("chunk '{}' has no embedding", bare.id),
            });
        }

        let mut entries = self.entries.write().await;
        for chunk in chunks {
            entries.insert(chunk.id.clone(), chunk.clone());
        }
        Ok(())
    }

    async fn search(
        &self,
        embedding: &[f32],
        top_k: usize,
        min_score: f32,
    ) -> Result<Vec<SearchResult>> {
        let entries = self.entries.read().await;

        let mut hits: Vec<SearchResult> = entries
            .values()
            .filter_map(|chunk| {
                let score = cosine(&chunk.embedding, embedding);
                // Exclusive threshold: a tie at min_score does not pass.
                (score > min_score).then(|| SearchResult { chunk: chunk.clone(), score })
            })
            .collect();

        hits.sort_by(|left, right| {
            right.score.partial_cmp(&left.score).unwrap_or(Ordering::Equal)
        });
        hits.truncate(top_k);
        Ok(hits)
    }
}
