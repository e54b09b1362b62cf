//! Configuration for collections and queries.

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// Default chunk size in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 2000;

/// Default minimum relevance score for retrieval.
pub const DEFAULT_SCORE_THRESHOLD: f32 = 0.5;

/// Chunking parameters for a paper collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CollectionConfig {
    /// Maximum chunk size in characters.
    pub chunk_size: usize,
    /// Number of overlapping characters between consecutive chunks.
    pub chunk_overlap: usize,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self { chunk_size: DEFAULT_CHUNK_SIZE, chunk_overlap: 0 }
    }
}

impl CollectionConfig {
    /// Create a new builder for constructing a [`CollectionConfig`].
    pub fn builder() -> CollectionConfigBuilder {
        CollectionConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`CollectionConfig`].
#[derive(Debug, Clone, Default)]
pub struct CollectionConfigBuilder {
    config: CollectionConfig,
}

impl CollectionConfigBuilder {
    /// Set the maximum chunk size in characters.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Set the overlap between consecutive chunks in characters.
    pub fn chunk_overlap(mut self, overlap: usize) -> Self {
        self.config.chunk_overlap = overlap;
        self
    }

    /// Build the [`CollectionConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if `chunk_size == 0` or
    /// `chunk_overlap >= chunk_size`.
    pub fn build(self) -> Result<CollectionConfig> {
        if self.config.chunk_size == 0 {
            return Err(RagError::Config("chunk_size must be greater than zero".to_string()));
        }
        if self.config.chunk_overlap >= self.config.chunk_size {
            return Err(RagError::Config(format!(
                "chunk_overlap ({}) must be less than chunk_size ({})",
                self.config.chunk_overlap, self.config.chunk_size
            )));
        }
        Ok(self.config)
    }
}

/// Options for one retrieval query, threaded explicitly through every layer.
///
/// Replaces opaque keyword forwarding: each layer receives the same
/// enumerated set of knobs.
///
/// # Example
///
/// ```rust,ignore
/// use scholar_rag::QueryOptions;
///
/// let opts = QueryOptions::new("medical question answering")
///     .with_k(5)
///     .with_score_threshold(0.4);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryOptions {
    /// The query text.
    pub query: String,
    /// Result count; when `None` the index derives `floor(sqrt(N))` from
    /// its chunk count `N`.
    pub k: Option<usize>,
    /// Minimum relevance score. Candidates must score strictly above this.
    pub score_threshold: f32,
}

impl QueryOptions {
    /// Options for `query` with adaptive `k` and the default threshold.
    pub fn new(query: impl Into<String>) -> Self {
        Self { query: query.into(), k: None, score_threshold: DEFAULT_SCORE_THRESHOLD }
    }

    /// Request exactly `k` candidates instead of the adaptive default.
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = Some(k);
        self
    }

    /// Override the minimum relevance score.
    pub fn with_score_threshold(mut self, threshold: f32) -> Self {
        self.score_threshold = threshold;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_no_overlap() {
        let config = CollectionConfig::default();
        assert_eq!(config.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(config.chunk_overlap, 0);
    }

    #[test]
    fn builder_rejects_overlap_not_below_chunk_size() {
        let err = CollectionConfig::builder().chunk_size(100).chunk_overlap(100).build();
        assert!(matches!(err, Err(RagError::Config(_))));
    }

    #[test]
    fn builder_rejects_zero_chunk_size() {
        let err = CollectionConfig::builder().chunk_size(0).build();
        assert!(matches!(err, Err(RagError::Config(_))));
    }

    #[test]
    fn options_default_to_adaptive_k() {
        let opts = QueryOptions::new("q");
        assert_eq!(opts.k, None);
        assert_eq!(opts.score_threshold, DEFAULT_SCORE_THRESHOLD);
    }
}
