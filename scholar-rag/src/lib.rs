//! # scholar-rag
//!
//! Retrieval, aggregation, and routed summarization over a research-paper
//! corpus.
//!
//! ## Overview
//!
//! The crate is built around three cooperating pieces:
//!
//! - [`EmbeddingIndex`] — an embedding-backed similarity index with
//!   adaptive result sizing (`floor(sqrt(N))` when no `k` is given) and
//!   strict score filtering
//! - [`PaperCollection`] — ingests papers, chunks them, forwards chunks to
//!   the index, and folds chunk hits back into deduplicated papers
//! - [`RetrieverCache`] + [`SummaryRouter`] — per-paper fine-grained
//!   retrieval with same-paper merge, then summarization routed to a small
//!   or large model by prompt size
//!
//! [`CorpusChat`] wires the three into the full query flow. Papers can be
//! added directly, in batches, or fetched from arXiv via [`ArxivSource`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use scholar_model::OpenAiChatModel;
//! use scholar_rag::{ArxivSource, CorpusChat, OpenAiEmbeddingProvider, PaperCollection, QueryOptions};
//!
//! let provider = Arc::new(OpenAiEmbeddingProvider::from_env()?);
//! let mut collection = PaperCollection::new(provider);
//! collection.add_from_source(&ArxivSource::new(), "ti:retrieval").await?;
//!
//! let small = Arc::new(OpenAiChatModel::from_env("gpt-4o-mini")?);
//! let large = Arc::new(OpenAiChatModel::from_env("gpt-4o")?);
//! let mut chat = CorpusChat::new(collection, small, large);
//!
//! let sources = chat.source_and_summarize(&QueryOptions::new("medical QA")).await?;
//! ```

pub mod cache;
pub mod chat;
pub mod chunking;
pub mod citation;
pub mod collection;
pub mod config;
pub mod document;
pub mod download;
pub mod embedding;
pub mod error;
pub mod index;
pub mod inmemory;
pub mod openai;
pub mod router;
pub mod source;
pub mod vectorstore;

pub use cache::RetrieverCache;
pub use chat::CorpusChat;
pub use chunking::{Chunker, FixedSizeChunker};
pub use collection::{PaperCollection, PaperCollectionBuilder};
pub use config::{CollectionConfig, QueryOptions};
pub use document::{Chunk, Paper, SearchResult};
pub use download::download_file;
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use index::EmbeddingIndex;
pub use inmemory::InMemoryVectorStore;
pub use openai::OpenAiEmbeddingProvider;
pub use router::SummaryRouter;
pub use source::{ArxivSource, PaperSource};
pub use vectorstore::VectorStore;
