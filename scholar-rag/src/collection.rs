//! The paper collection: ingestion, deduplication, and coarse retrieval.
//!
//! [`PaperCollection`] owns the canonical set of papers, chunks each new
//! paper's canonical text, forwards the chunks to its [`EmbeddingIndex`],
//! and folds chunk-level search hits back into a deduplicated, score-ordered
//! list of parent papers.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{info, warn};

use crate::chunking::{Chunker, FixedSizeChunker};
use crate::config::{CollectionConfig, QueryOptions};
use crate::document::Paper;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::index::EmbeddingIndex;
use crate::source::PaperSource;
use crate::vectorstore::VectorStore;

/// A deduplicated corpus of papers with an embedding index over their chunks.
///
/// Papers are keyed by title; inserting a duplicate title is a logged no-op.
/// Insertion order is preserved for bibliography output.
pub struct PaperCollection {
    papers: Vec<Paper>,
    titles: HashMap<String, usize>,
    index: EmbeddingIndex,
    chunker: Arc<dyn Chunker>,
    embed: bool,
}

impl PaperCollection {
    /// Create a collection with the default config and an in-memory store.
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        let config = CollectionConfig::default();
        PaperCollection {
            papers: Vec::new(),
            titles: HashMap::new(),
            chunker: Arc::new(FixedSizeChunker::from_config(&config)),
            index: EmbeddingIndex::in_memory(provider),
            embed: true,
        }
    }

    /// Create a new [`PaperCollectionBuilder`].
    pub fn builder() -> PaperCollectionBuilder {
        PaperCollectionBuilder::default()
    }

    /// Number of papers in the collection.
    pub fn len(&self) -> usize {
        self.papers.len()
    }

    /// Whether the collection holds no papers.
    pub fn is_empty(&self) -> bool {
        self.papers.is_empty()
    }

    /// Look up a paper by title.
    pub fn get(&self, title: &str) -> Option<&Paper> {
        self.titles.get(title).map(|&i| &self.papers[i])
    }

    /// All papers in insertion order.
    pub fn papers(&self) -> &[Paper] {
        &self.papers
    }

    /// Number of chunks forwarded to the index so far.
    pub fn chunk_count(&self) -> usize {
        self.index.chunk_count()
    }

    /// The provider the collection embeds with.
    pub fn embedding_provider(&self) -> &Arc<dyn EmbeddingProvider> {
        self.index.provider()
    }

    /// The chunker used for ingestion.
    pub fn chunker(&self) -> &Arc<dyn Chunker> {
        &self.chunker
    }

    /// Add one paper to the collection.
    ///
    /// A duplicate title is skipped without mutation. Otherwise the paper is
    /// registered, its canonical text chunked, each chunk tagged with the
    /// title, and the batch forwarded to the index. A collection built with
    /// `without_embedding()` only registers the paper.
    ///
    /// # Errors
    ///
    /// Propagates index errors; on error the paper registration is rolled
    /// back so a failed add leaves the collection unchanged.
    pub async fn add_paper(&mut self, paper: Paper) -> Result<()> {
        info!(title = %paper.title, "adding paper to the collection");
        if self.titles.contains_key(&paper.title) {
            info!(title = %paper.title, "paper already exists in the collection");
            return Ok(());
        }

        let title = paper.title.clone();
        let chunks = if self.embed { self.chunker.chunk(&paper) } else { Vec::new() };

        self.titles.insert(title.clone(), self.papers.len());
        self.papers.push(paper);

        if let Err(e) = self.index.add(chunks).await {
            self.titles.remove(&title);
            self.papers.pop();
            return Err(e);
        }
        Ok(())
    }

    /// Add every paper from an iterator, in order.
    pub async fn add_papers(&mut self, papers: impl IntoIterator<Item = Paper>) -> Result<()> {
        for paper in papers {
            self.add_paper(paper).await?;
        }
        Ok(())
    }

    /// Fetch papers from a corpus source and add them all.
    ///
    /// Returns how many papers the source yielded (including duplicates
    /// that were skipped).
    pub async fn add_from_source(
        &mut self,
        source: &dyn PaperSource,
        query: &str,
    ) -> Result<usize> {
        let papers = source.fetch(query).await?;
        let fetched = papers.len();
        self.add_papers(papers).await?;
        Ok(fetched)
    }

    /// Retrieve the papers relevant to a query, deduplicated by title.
    ///
    /// Chunk-level hits are folded into parent papers: the first (highest-
    /// scoring) occurrence of a title wins and fixes that paper's position,
    /// so the returned order is explicit score order, not map iteration
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::EmptyCollection`] when no papers have been
    /// added, before any index or provider call is made. Index errors
    /// propagate.
    pub async fn query(&self, options: &QueryOptions) -> Result<Vec<Paper>> {
        info!(query = %options.query, "sourcing papers for query");
        if self.papers.is_empty() {
            return Err(RagError::EmptyCollection);
        }

        let hits = self.index.search(options).await?;

        let mut seen: HashSet<&str> = HashSet::new();
        let mut found = Vec::new();
        for hit in &hits {
            let Some(title) = hit.chunk.source() else {
                warn!(chunk = %hit.chunk.id, "chunk has no source title, skipping");
                continue;
            };
            if !seen.insert(title) {
                continue;
            }
            match self.get(title) {
                Some(paper) => {
                    info!(score = hit.score, %title, "found paper");
                    found.push(paper.clone());
                }
                None => warn!(%title, "chunk references a paper missing from the collection"),
            }
        }
        Ok(found)
    }

    /// LaTeX bibliography entries for every paper, in insertion order.
    pub fn bibliography(&self) -> Vec<String> {
        self.papers.iter().map(Paper::latex_citation).collect()
    }
}

/// Builder for constructing a [`PaperCollection`].
///
/// Only the embedding provider is required; config, store, and chunker have
/// defaults.
#[derive(Default)]
pub struct PaperCollectionBuilder {
    config: Option<CollectionConfig>,
    provider: Option<Arc<dyn EmbeddingProvider>>,
    store: Option<Arc<dyn VectorStore>>,
    chunker: Option<Arc<dyn Chunker>>,
    no_embedding: bool,
}

impl PaperCollectionBuilder {
    /// Set the chunking configuration.
    pub fn config(mut self, config: CollectionConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider (required).
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the vector store backend (defaults to in-memory).
    pub fn vector_store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the chunker (defaults to a fixed-size chunker from the config).
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Register papers without chunking or embedding them.
    pub fn without_embedding(mut self) -> Self {
        self.no_embedding = true;
        self
    }

    /// Build the collection, validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if no embedding provider was set.
    pub fn build(self) -> Result<PaperCollection> {
        let provider = self
            .provider
            .ok_or_else(|| RagError::Config("embedding_provider is required".to_string()))?;
        let config = self.config.unwrap_or_default();
        let chunker =
            self.chunker.unwrap_or_else(|| Arc::new(FixedSizeChunker::from_config(&config)));
        let index = match self.store {
            Some(store) => EmbeddingIndex::new(provider, store),
            None => EmbeddingIndex::in_memory(provider),
        };
        Ok(PaperCollection {
            papers: Vec::new(),
            titles: HashMap::new(),
            index,
            chunker,
            embed: !self.no_embedding,
        })
    }
}
