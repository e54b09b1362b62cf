//! Shared test support: deterministic embedding providers and paper fixtures.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use scholar_rag::document::{Chunk, Paper, SearchResult};
use scholar_rag::embedding::EmbeddingProvider;
use scholar_rag::error::{RagError, Result};
use scholar_rag::inmemory::InMemoryVectorStore;
use scholar_rag::vectorstore::VectorStore;

/// Embeds text as a 2-d unit vector chosen by marker substring.
///
/// A text containing marker `m` with weight `s` maps to `(s, sqrt(1-s²))`,
/// so its cosine similarity against the query axis `(1, 0)` is exactly `s`.
/// Texts without any marker (queries included) map to the axis itself.
pub struct MarkerEmbedding {
    markers: Vec<(&'static str, f32)>,
    embed_calls: AtomicUsize,
}

impl MarkerEmbedding {
    pub fn new(markers: Vec<(&'static str, f32)>) -> Self {
        Self { markers, embed_calls: AtomicUsize::new(0) }
    }

    /// How many texts have been embedded so far.
    pub fn embed_count(&self) -> usize {
        self.embed_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for MarkerEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_calls.fetch_add(1, Ordering::SeqCst);
        for (marker, score) in &self.markers {
            if text.contains(marker) {
                return Ok(vec![*score, (1.0 - score * score).sqrt()]);
            }
        }
        Ok(vec![1.0, 0.0])
    }

    fn dimensions(&self) -> usize {
        2
    }
}

/// A provider that always fails, for atomicity tests.
pub struct FailingEmbedding;

#[async_trait]
impl EmbeddingProvider for FailingEmbedding {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(RagError::Embedding { provider: "failing".into(), message: "backend down".into() })
    }

    fn dimensions(&self) -> usize {
        2
    }
}

/// A store wrapper that records the `top_k` of every search call.
pub struct RecordingStore {
    inner: InMemoryVectorStore,
    requested: Mutex<Vec<usize>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self { inner: InMemoryVectorStore::new(), requested: Mutex::new(Vec::new()) }
    }

    /// The `top_k` values passed to `search`, in call order.
    pub fn requested(&self) -> Vec<usize> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl VectorStore for RecordingStore {
    async fn upsert(&self, chunks: &[Chunk]) -> Result<()> {
        self.inner.upsert(chunks).await
    }

    async fn search(
        &self,
        embedding: &[f32],
        top_k: usize,
        min_score: f32,
    ) -> Result<Vec<SearchResult>> {
        self.requested.lock().unwrap().push(top_k);
        self.inner.search(embedding, top_k, min_score).await
    }
}

/// A paper whose summary is laid out so that a 30-char chunker yields one
/// marker per chunk.
pub fn paper(title: &str, summary: &str) -> Paper {
    Paper {
        title: title.into(),
        summary: summary.into(),
        url: format!("https://arxiv.org/pdf/{title}"),
        authors: vec!["T. Author".into()],
        published: Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap(),
        on_arxiv: true,
    }
}

/// Paper "A": 3 chunks at chunk size 30, carrying markers `ahi`, `amid`,
/// `alow` in chunk order.
///
/// Canonical text is `Title: A\nAbstract: {summary}` — a 19-char prefix —
/// so the windows are `[0,30)`, `[30,60)`, `[60,…)`.
pub fn paper_a() -> Paper {
    // window 0: prefix (19) + "ahi aaaaaaa" (11)
    // window 1: "amid" + 26 × 'q'
    // window 2: "alow" + 10 × 'q'
    let summary =
        format!("ahi aaaaaaaamid{}alow{}", "q".repeat(26), "q".repeat(10));
    paper("A", &summary)
}

/// Paper "B": 3 chunks at chunk size 30, every chunk carrying `boff`.
pub fn paper_b() -> Paper {
    // window 0: prefix (19) + "boff" + 7 × 'z'
    // windows 1 and 2: "boff" + 26 × 'z' each
    let summary = format!(
        "boff{}boff{}boff{}",
        "z".repeat(7),
        "z".repeat(26),
        "z".repeat(26),
    );
    paper("B", &summary)
}

/// The marker table matching [`paper_a`] and [`paper_b`].
pub fn scenario_markers() -> Vec<(&'static str, f32)> {
    vec![("ahi", 0.9), ("amid", 0.7), ("alow", 0.4), ("boff", 0.1)]
}
