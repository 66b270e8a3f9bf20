//! Research connectors
//!
//! Tavily-style web search is the primary discovery mechanism. Returned URLs
//! are classified by [`link_analyzer`] and, where they point at arXiv papers
//! or Wikipedia articles, enriched with the specialized extractors.

/// arXiv abstract-page extractor.
pub mod arxiv;
/// URL classification for conditional enrichment.
pub mod link_analyzer;
/// Web search via the Tavily API.
pub mod search;
/// Wikipedia article summary extractor.
pub mod wikipedia;

pub use arxiv::ArxivExtractor;
pub use link_analyzer::{ClassifiedLinks, LinkAnalyzer};
pub use search::TavilyClient;
pub use wikipedia::WikipediaExtractor;
