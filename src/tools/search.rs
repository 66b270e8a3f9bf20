//! Web search via the Tavily API
//!
//! Tavily is the primary discovery mechanism: one POST per research task.
//! Results are later classified by the link analyzer to decide which URLs
//! get arXiv/Wikipedia enrichment.

use crate::types::{AppError, Result};
use serde::{Deserialize, Serialize};

/// Default Tavily API base
pub const DEFAULT_API_BASE: &str = "https://api.tavily.com";

/// A single raw search hit.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    /// Result title
    #[serde(default)]
    pub title: String,
    /// Result URL
    pub url: String,
    /// Snippet/content from the result
    #[serde(default)]
    pub content: String,
    /// Relevance score reported by Tavily
    #[serde(default)]
    pub score: f32,
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: usize,
    include_answer: bool,
    include_raw_content: bool,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

/// Client for the Tavily search API.
pub struct TavilyClient {
    http: reqwest::Client,
    api_key: String,
    api_base: String,
    max_results: usize,
}

impl TavilyClient {
    /// Create a client with the given API key.
    pub fn new(api_key: impl Into<String>, max_results: usize) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            max_results,
        }
    }

    /// Override the API base URL (mock servers in tests).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Execute a web search.
    ///
    /// Zero hits is reported as a [`AppError::Search`] failure: a task with
    /// nothing to read from is a degraded task, and the orchestrator absorbs
    /// it per its failure policy.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        let url = format!("{}/search", self.api_base.trim_end_matches('/'));
        tracing::debug!(query, "tavily search");

        let response = self
            .http
            .post(&url)
            .json(&SearchRequest {
                api_key: &self.api_key,
                query,
                max_results: self.max_results,
                include_answer: false,
                include_raw_content: false,
            })
            .send()
            .await
            .map_err(|e| AppError::Search(format!("tavily request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Search(format!(
                "tavily returned {} for query '{}'",
                status, query
            )));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| AppError::Search(format!("malformed tavily response: {}", e)))?;

        if parsed.results.is_empty() {
            return Err(AppError::Search(format!("no results for query '{}'", query)));
        }

        tracing::debug!(query, result_count = parsed.results.len(), "tavily search complete");
        Ok(parsed.results)
    }
}
