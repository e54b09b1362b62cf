//! Corpus sources: where papers come from.
//!
//! [`PaperSource`] is the narrow interface the collection consumes;
//! [`ArxivSource`] implements it against the arXiv Atom API.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::{debug, warn};

use crate::document::Paper;
use crate::error::{RagError, Result};

/// The arXiv Atom query endpoint.
const ARXIV_API_URL: &str = "http://export.arxiv.org/api/query";

/// Default number of results requested per fetch.
const DEFAULT_MAX_RESULTS: usize = 10;

/// A provider of papers for ingestion.
#[async_trait]
pub trait PaperSource: Send + Sync {
    /// Fetch papers matching a search query.
    async fn fetch(&self, query: &str) -> Result<Vec<Paper>>;
}

/// A [`PaperSource`] backed by the arXiv Atom API.
///
/// Queries use arXiv search syntax, e.g. `au:Du AND ti:LLM` or
/// `all:electron`. Entries that cannot be parsed are skipped with a
/// warning rather than failing the whole fetch.
///
/// # Example
///
/// ```rust,ignore
/// use scholar_rag::{ArxivSource, PaperSource};
///
/// let source = ArxivSource::new().with_max_results(3);
/// let papers = source.fetch("ti:retrieval augmented generation").await?;
/// ```
pub struct ArxivSource {
    client: reqwest::Client,
    base_url: String,
    max_results: usize,
}

impl Default for ArxivSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ArxivSource {
    /// Create a source against the public arXiv API.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: ARXIV_API_URL.into(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    /// Cap the number of entries requested per fetch.
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Point the source at a different endpoint (tests, mirrors).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl PaperSource for ArxivSource {
    async fn fetch(&self, query: &str) -> Result<Vec<Paper>> {
        debug!(%query, max_results = self.max_results, "fetching papers from arXiv");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("search_query", query),
                ("start", "0"),
                ("max_results", &self.max_results.to_string()),
            ])
            .send()
            .await
            .map_err(|e| RagError::CorpusSource {
                provider: "arXiv".into(),
                message: format!("request failed: {e}"),
            })?;

        if !response.status().is_success() {
            return Err(RagError::CorpusSource {
                provider: "arXiv".into(),
                message: format!("API returned {}", response.status()),
            });
        }

        let body = response.text().await.map_err(|e| RagError::CorpusSource {
            provider: "arXiv".into(),
            message: format!("failed to read response body: {e}"),
        })?;

        parse_atom_feed(&body)
    }
}

/// One partially-parsed `<entry>` element.
#[derive(Default)]
struct EntryFields {
    title: Option<String>,
    summary: Option<String>,
    published: Option<DateTime<Utc>>,
    authors: Vec<String>,
    pdf_url: Option<String>,
    id_url: Option<String>,
}

impl EntryFields {
    fn into_paper(self) -> Option<Paper> {
        let title = self.title?;
        let url = self.pdf_url.or(self.id_url)?;
        Some(Paper {
            title,
            summary: self.summary.unwrap_or_default(),
            url,
            authors: self.authors,
            published: self.published?,
            on_arxiv: true,
        })
    }
}

/// Collapse runs of whitespace (arXiv wraps titles across lines).
fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse an arXiv Atom feed into papers, skipping malformed entries.
pub(crate) fn parse_atom_feed(xml: &str) -> Result<Vec<Paper>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut papers = Vec::new();
    let mut entry: Option<EntryFields> = None;
    let mut current_tag: Vec<u8> = Vec::new();

    loop {
        let event = reader.read_event().map_err(|e| RagError::CorpusSource {
            provider: "arXiv".into(),
            message: format!("malformed feed: {e}"),
        })?;

        match event {
            Event::Start(e) => {
                current_tag = e.name().as_ref().to_vec();
                if current_tag == b"entry" {
                    entry = Some(EntryFields::default());
                }
            }
            Event::Empty(e) => {
                // <link … /> carries the PDF location as attributes.
                if e.name().as_ref() == b"link" {
                    if let Some(fields) = entry.as_mut() {
                        let mut href = None;
                        let mut is_pdf = false;
                        for attr in e.attributes().flatten() {
                            match attr.key.as_ref() {
                                b"href" => {
                                    href = attr.unescape_value().ok().map(|v| v.into_owned());
                                }
                                b"title" => {
                                    is_pdf = attr.unescape_value().ok().as_deref() == Some("pdf");
                                }
                                _ => {}
                            }
                        }
                        if is_pdf {
                            fields.pdf_url = href;
                        }
                    }
                }
            }
            Event::Text(t) => {
                let Some(fields) = entry.as_mut() else { continue };
                let text = t.unescape().map_err(|e| RagError::CorpusSource {
                    provider: "arXiv".into(),
                    message: format!("malformed feed text: {e}"),
                })?;
                match current_tag.as_slice() {
                    b"title" => fields.title = Some(normalize_whitespace(&text)),
                    b"summary" => fields.summary = Some(normalize_whitespace(&text)),
                    b"published" => {
                        fields.published = DateTime::parse_from_rfc3339(text.trim())
                            .ok()
                            .map(|d| d.with_timezone(&Utc));
                    }
                    b"name" => fields.authors.push(text.trim().to_string()),
                    b"id" => fields.id_url = Some(text.trim().to_string()),
                    _ => {}
                }
            }
            Event::End(e) => {
                current_tag.clear();
                if e.name().as_ref() == b"entry" {
                    if let Some(fields) = entry.take() {
                        match fields.into_paper() {
                            Some(paper) => papers.push(paper),
                            None => warn!("skipping feed entry with missing fields"),
                        }
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    debug!(count = papers.len(), "parsed feed entries");
    Ok(papers)
}
