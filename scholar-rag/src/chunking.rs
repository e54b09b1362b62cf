//! Paper chunking.
//!
//! One strategy: [`FixedSizeChunker`], a deterministic length-based splitter
//! with no semantic awareness. It slices the paper's canonical text
//! (`Title: …\nAbstract: …`) into windows of at most `chunk_size`
//! characters.

use crate::config::CollectionConfig;
use crate::document::{Chunk, Paper, SOURCE_KEY};

/// A strategy for splitting a paper into chunks.
///
/// Implementations produce [`Chunk`]s with text and metadata but no
/// embeddings; embeddings are attached by the index on add. Every chunk's
/// metadata carries `source = paper title`.
pub trait Chunker: Send + Sync {
    /// Split a paper's canonical text into chunks.
    ///
    /// Returns an empty `Vec` when the paper serializes to empty text.
    fn chunk(&self, paper: &Paper) -> Vec<Chunk>;
}

/// Splits text into fixed-size chunks by character count.
///
/// Counting is in `char`s, so multi-byte text never splits inside a code
/// point. Chunk IDs are `{paper title}_{chunk index}`.
///
/// # Example
///
/// ```rust,ignore
/// use scholar_rag::FixedSizeChunker;
///
/// let chunker = FixedSizeChunker::new(2000, 0);
/// let chunks = chunker.chunk(&paper);
/// ```
#[derive(Debug, Clone)]
pub struct FixedSizeChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl FixedSizeChunker {
    /// Create a new `FixedSizeChunker`.
    ///
    /// # Arguments
    ///
    /// * `chunk_size` — maximum number of characters per chunk
    /// * `chunk_overlap` — characters shared between consecutive chunks
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self { chunk_size, chunk_overlap }
    }

    /// Build a chunker from a [`CollectionConfig`].
    pub fn from_config(config: &CollectionConfig) -> Self {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    /// Split raw text into windows of at most `chunk_size` characters.
    fn split(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }

        let chars: Vec<char> = text.chars().collect();
        let mut pieces = Vec::new();
        let mut start = 0;

        while start < chars.len() {
            let end = (start + self.chunk_size).min(chars.len());
            pieces.push(chars[start..end].iter().collect());
            let step = self.chunk_size.saturating_sub(self.chunk_overlap);
            if step == 0 {
                break;
            }
            start += step;
        }

        pieces
    }
}

impl Chunker for FixedSizeChunker {
    fn chunk(&self, paper: &Paper) -> Vec<Chunk> {
        let text = paper.canonical_text();

        self.split(&text)
            .into_iter()
            .enumerate()
            .map(|(i, text)| {
                let mut metadata = std::collections::HashMap::new();
                metadata.insert(SOURCE_KEY.to_string(), paper.title.clone());
                metadata.insert("chunk_index".to_string(), i.to_string());
                Chunk {
                    id: format!("{}_{i}", paper.title),
                    text,
                    embedding: Vec::new(),
                    metadata,
                }
            })
            .collect()
    }
}
