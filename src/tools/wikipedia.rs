//! Wikipedia article extractor - conditional enrichment for encyclopedia
//! content
//!
//! Activates when search results contain wikipedia.org links. Uses the REST
//! summary endpoint, which returns clean JSON without HTML scraping.

use crate::tools::link_analyzer::LinkAnalyzer;
use crate::types::{AppError, Result, WikiArticle};
use futures::future::join_all;
use serde::Deserialize;

/// Default Wikipedia REST API base
pub const DEFAULT_BASE_URL: &str = "https://en.wikipedia.org";

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    title: String,
    #[serde(default)]
    extract: String,
    #[serde(default)]
    content_urls: Option<ContentUrls>,
}

#[derive(Debug, Deserialize)]
struct ContentUrls {
    desktop: PageUrls,
}

#[derive(Debug, Deserialize)]
struct PageUrls {
    page: String,
}

/// Extracts article summaries from the Wikipedia REST API.
pub struct WikipediaExtractor {
    http: reqwest::Client,
    base_url: String,
    link_analyzer: LinkAnalyzer,
}

impl Default for WikipediaExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl WikipediaExtractor {
    /// Create an extractor against en.wikipedia.org.
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            link_analyzer: LinkAnalyzer::new(),
        }
    }

    /// Override the base URL (other languages, mock servers in tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Extract articles from multiple Wikipedia URLs, concurrently.
    ///
    /// URLs that fail to resolve are skipped with a warning.
    pub async fn extract_articles<S: AsRef<str>>(&self, urls: &[S]) -> Vec<WikiArticle> {
        let titles: Vec<String> = urls
            .iter()
            .filter_map(|url| self.link_analyzer.extract_wikipedia_title(url.as_ref()))
            .collect();

        let fetched = join_all(titles.iter().map(|title| self.fetch_article(title))).await;

        let mut articles = Vec::new();
        for (title, outcome) in titles.iter().zip(fetched) {
            match outcome {
                Ok(article) => articles.push(article),
                Err(e) => {
                    tracing::warn!(title = %title, error = %e, "wikipedia extraction failed")
                }
            }
        }
        articles
    }

    /// Fetch a single article summary by title slug.
    pub async fn fetch_article(&self, title: &str) -> Result<WikiArticle> {
        let url = format!(
            "{}/api/rest_v1/page/summary/{}",
            self.base_url.trim_end_matches('/'),
            title
        );

        let response = self
            .http
            .get(&url)
            .header("User-Agent", "sage-research/0.3 (https://github.com/dirmacs/sage)")
            .send()
            .await
            .map_err(|e| AppError::Search(format!("wikipedia request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Search(format!(
                "wikipedia returned {} for article '{}'",
                status, title
            )));
        }

        let parsed: SummaryResponse = response
            .json()
            .await
            .map_err(|e| AppError::Search(format!("malformed wikipedia response: {}", e)))?;

        let page_url = parsed
            .content_urls
            .map(|c| c.desktop.page)
            .unwrap_or_else(|| {
                format!(
                    "{}/wiki/{}",
                    self.base_url.trim_end_matches('/'),
                    title
                )
            });

        Ok(WikiArticle {
            title: parsed.title,
            url: page_url,
            summary: parsed.extract,
        })
    }
}
