//! Data types for papers, chunks, and search results.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata key carrying the owning paper's title on every chunk.
pub const SOURCE_KEY: &str = "source";

/// A research paper: the unit of ingestion and of deduplicated retrieval.
///
/// Identity is the `title` — a collection never holds two papers with the
/// same title.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Paper {
    /// The paper title. Unique key within a collection.
    pub title: String,
    /// The abstract (or other summary text) that gets indexed.
    pub summary: String,
    /// Where the paper can be fetched, typically a PDF URL.
    pub url: String,
    /// Author names in citation order.
    pub authors: Vec<String>,
    /// Publication date.
    pub published: DateTime<Utc>,
    /// Whether the paper came from arXiv (affects citation keys).
    pub on_arxiv: bool,
}

impl Paper {
    /// The serialized form that gets chunked and embedded.
    pub fn canonical_text(&self) -> String {
        format!("Title: {}\nAbstract: {}", self.title, self.summary)
    }
}

/// A bounded-length segment of a paper's canonical text.
///
/// Chunks are the unit stored in the embedding index. The `embedding` is
/// empty until the index attaches one; `metadata` always carries
/// [`SOURCE_KEY`] pointing back at the owning paper.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Unique identifier, `{paper title}_{chunk index}`.
    pub id: String,
    /// The text content of the chunk.
    pub text: String,
    /// The vector embedding for this chunk's text.
    pub embedding: Vec<f32>,
    /// Key-value metadata; at minimum the owning paper title under `source`.
    pub metadata: HashMap<String, String>,
}

impl Chunk {
    /// The owning paper's title, if the chunk was produced by a chunker.
    pub fn source(&self) -> Option<&str> {
        self.metadata.get(SOURCE_KEY).map(String::as_str)
    }
}

/// A retrieved [`Chunk`] paired with a relevance score in `[0, 1]`.
///
/// Produced transiently by a search; a merged result (see the retriever
/// cache) carries concatenated text under the first hit's score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// The similarity score (higher is more relevant).
    pub score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn paper() -> Paper {
        Paper {
            title: "Adaptive Retrieval".into(),
            summary: "We study adaptive result sizing.".into(),
            url: "https://example.org/pdf/1".into(),
            authors: vec!["A. Author".into()],
            published: Utc.with_ymd_and_hms(2023, 4, 1, 0, 0, 0).unwrap(),
            on_arxiv: false,
        }
    }

    #[test]
    fn canonical_text_prefixes_title_and_abstract() {
        assert_eq!(
            paper().canonical_text(),
            "Title: Adaptive Retrieval\nAbstract: We study adaptive result sizing."
        );
    }
}
