//! Citation rendering for papers.
//!
//! Three formats: a plain arXiv-style line, a short APA-style inline
//! citation, and a LaTeX `@misc` bibliography entry.

use chrono::Datelike;

use crate::document::Paper;

impl Paper {
    /// Plain citation line: `authors, year. title. url`.
    pub fn arxiv_citation(&self) -> String {
        let authors = self.authors.join(", ");
        format!("{authors}, {}. {}. {}", self.published.year(), self.title, self.url)
    }

    /// Short inline citation: `First Author et al. (year)`.
    pub fn apa_citation(&self) -> String {
        let first = self.authors.first().map(String::as_str).unwrap_or("Unknown");
        format!("{first} et al. ({})", self.published.year())
    }

    /// The key used for the LaTeX entry.
    ///
    /// ArXiv papers use the identifier from their URL; everything else gets
    /// a dash-joined title with quotes and commas stripped.
    pub fn latex_citation_name(&self) -> String {
        if self.on_arxiv {
            self.url.rsplit('/').next().unwrap_or(&self.url).to_string()
        } else {
            self.title.replace(' ', "-").replace(['\'', ','], "")
        }
    }

    /// A LaTeX `@misc` bibliography entry.
    ///
    /// The URL is rewritten from `/pdf/` to `/abs/` so the entry points at
    /// the landing page rather than the file.
    pub fn latex_citation(&self) -> String {
        format!(
            "@misc{{{name},\n  title={{{title}}},\n  author={{{authors}}},\n  url={{{url}}},\n  date={{{year}}},\n}}\n",
            name = self.latex_citation_name(),
            title = self.title.replace('_', "-"),
            authors = self.authors.join(" and "),
            url = self.url.replace("/pdf/", "/abs/"),
            year = self.published.year(),
        )
    }
}
