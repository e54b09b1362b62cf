//! Error types for the `scholar-rag` crate.

use thiserror::Error;

/// Errors that can occur in retrieval and summarization operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// The embedding provider was unreachable or returned an error.
    #[error("Embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The vector store backend was unreachable or returned an error.
    #[error("Vector store error ({backend}): {message}")]
    VectorStore {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// A corpus source (e.g. the arXiv API) failed to yield papers.
    #[error("Corpus source error ({provider}): {message}")]
    CorpusSource {
        /// The source that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// A query was issued against a collection with no papers in it.
    #[error("the paper collection is empty")]
    EmptyCollection,

    /// Summarization was requested but the aggregated source list is empty.
    #[error("no sources found")]
    NoSources,

    /// A download exhausted its retry budget without a successful response.
    #[error("failed to download {url} after {attempts} attempts")]
    Connection {
        /// The URL that could not be fetched.
        url: String,
        /// How many attempts were made.
        attempts: u32,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A filesystem error while writing a downloaded file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error propagated from a language-model backend.
    #[error(transparent)]
    Model(#[from] scholar_model::ModelError),
}

/// A convenience result type for retrieval operations.
pub type Result<T> = std::result::Result<T, RagError>;
