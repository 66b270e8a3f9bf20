//! arXiv paper extractor - conditional enrichment for research papers
//!
//! Activates when search results contain arxiv.org links. Fetches the
//! abstract page for each paper and parses the metadata out of the HTML
//! with `scraper`.

use crate::tools::link_analyzer::LinkAnalyzer;
use crate::types::{AppError, ArxivPaper, Result};
use futures::future::join_all;
use scraper::{Html, Selector};

/// Default arXiv base URL
pub const DEFAULT_BASE_URL: &str = "https://arxiv.org";

/// Extracts paper metadata from arXiv abstract pages.
pub struct ArxivExtractor {
    http: reqwest::Client,
    base_url: String,
    link_analyzer: LinkAnalyzer,
}

impl Default for ArxivExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ArxivExtractor {
    /// Create an extractor against arxiv.org.
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            link_analyzer: LinkAnalyzer::new(),
        }
    }

    /// Override the base URL (mock servers in tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Extract papers from multiple arXiv URLs, concurrently.
    ///
    /// URLs that fail to resolve or parse are skipped with a warning; one bad
    /// paper never sinks the whole enrichment pass.
    pub async fn extract_papers<S: AsRef<str>>(&self, urls: &[S]) -> Vec<ArxivPaper> {
        let ids: Vec<String> = urls
            .iter()
            .filter_map(|url| self.link_analyzer.extract_arxiv_id(url.as_ref()))
            .collect();

        let fetched = join_all(ids.iter().map(|id| self.fetch_paper(id))).await;

        let mut papers = Vec::new();
        for (id, outcome) in ids.iter().zip(fetched) {
            match outcome {
                Ok(paper) => papers.push(paper),
                Err(e) => tracing::warn!(paper_id = %id, error = %e, "arxiv extraction failed"),
            }
        }
        papers
    }

    /// Fetch and parse a single paper's abstract page.
    pub async fn fetch_paper(&self, paper_id: &str) -> Result<ArxivPaper> {
        let url = format!("{}/abs/{}", self.base_url.trim_end_matches('/'), paper_id);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::Search(format!("arxiv request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Search(format!(
                "arxiv returned {} for paper '{}'",
                status, paper_id
            )));
        }

        let html = response
            .text()
            .await
            .map_err(|e| AppError::Search(format!("arxiv response unreadable: {}", e)))?;

        let mut paper = parse_abs_page(&html, paper_id)?;
        paper.url = url;
        Ok(paper)
    }
}

/// Parse the metadata blocks out of an abstract page.
///
/// Synchronous on purpose: `scraper::Html` is not `Send`, so it must never
/// live across an await point.
fn parse_abs_page(html: &str, paper_id: &str) -> Result<ArxivPaper> {
    let document = Html::parse_document(html);

    let title_sel = selector("h1.title")?;
    let abstract_sel = selector("blockquote.abstract")?;
    let authors_sel = selector("div.authors a")?;
    let dateline_sel = selector("div.dateline")?;

    let title = document
        .select(&title_sel)
        .next()
        .map(|el| collect_text(&el))
        .map(|t| strip_label(&t, "Title:"))
        .ok_or_else(|| AppError::Parse(format!("no title on abstract page for '{}'", paper_id)))?;

    let abstract_text = document
        .select(&abstract_sel)
        .next()
        .map(|el| collect_text(&el))
        .map(|t| strip_label(&t, "Abstract:"))
        .ok_or_else(|| {
            AppError::Parse(format!("no abstract on abstract page for '{}'", paper_id))
        })?;

    let authors: Vec<String> = document
        .select(&authors_sel)
        .map(|el| collect_text(&el))
        .filter(|name| !name.is_empty())
        .collect();

    let published = document
        .select(&dateline_sel)
        .next()
        .map(|el| collect_text(&el))
        .unwrap_or_default();

    Ok(ArxivPaper {
        arxiv_id: paper_id.to_string(),
        title,
        authors,
        abstract_text,
        published,
        url: String::new(),
    })
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| AppError::Parse(format!("bad selector '{}': {}", css, e)))
}

fn collect_text(element: &scraper::ElementRef<'_>) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn strip_label(text: &str, label: &str) -> String {
    text.trim()
        .strip_prefix(label)
        .unwrap_or(text)
        .trim()
        .to_string()
}
