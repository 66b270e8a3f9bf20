//! Researcher agent - executes research tasks with search and conditional
//! enrichment
//!
//! Pipeline per task: web search -> classify returned URLs -> enrich arXiv
//! and Wikipedia links with the specialized extractors -> merge into enriched
//! sources -> LLM summary of the merged evidence.

use crate::agents::{extract_json, Researcher};
use crate::llm::LLMClient;
use crate::tools::search::SearchHit;
use crate::tools::{ArxivExtractor, LinkAnalyzer, TavilyClient, WikipediaExtractor};
use crate::types::{
    AppError, ArxivPaper, EnrichedSource, ResearchTask, Result, SourceKind, TaskFindings,
    WikiArticle,
};
use async_trait::async_trait;
use serde::Deserialize;

const RESEARCHER_SYSTEM_PROMPT: &str = r#"You are a research assistant that synthesizes information from multiple sources.

Your job is to:
1. Analyze search results from web searches
2. Identify key information relevant to the research task
3. Note which sources are academic papers (arXiv) vs encyclopedic content (Wikipedia) vs general web
4. Create a concise summary of findings for the research task

Be objective and factual. Cite sources when making claims. Highlight any conflicting information across sources.

Respond with JSON only, in this exact shape:
{"summary": "<concise summary of findings>", "key_points": ["<point>", "..."]}"#;

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    summary: String,
    #[serde(default)]
    key_points: Vec<String>,
}

/// LLM-backed researcher with search and enrichment connectors.
pub struct ResearcherAgent {
    llm: Box<dyn LLMClient>,
    search: TavilyClient,
    arxiv: ArxivExtractor,
    wikipedia: WikipediaExtractor,
    link_analyzer: LinkAnalyzer,
}

impl ResearcherAgent {
    /// Create a researcher from its LLM client and connectors.
    pub fn new(
        llm: Box<dyn LLMClient>,
        search: TavilyClient,
        arxiv: ArxivExtractor,
        wikipedia: WikipediaExtractor,
    ) -> Self {
        Self {
            llm,
            search,
            arxiv,
            wikipedia,
            link_analyzer: LinkAnalyzer::new(),
        }
    }

    /// Merge raw hits with enriched records.
    ///
    /// Enriched records replace the raw hit for the same URL; enriched
    /// records without a matching hit are appended at the end.
    fn build_sources(
        hits: &[SearchHit],
        papers: &[ArxivPaper],
        articles: &[WikiArticle],
    ) -> Vec<EnrichedSource> {
        let mut sources = Vec::new();

        for hit in hits {
            if let Some(paper) = papers.iter().find(|p| p.url == hit.url) {
                sources.push(EnrichedSource {
                    kind: SourceKind::Arxiv,
                    url: paper.url.clone(),
                    title: paper.title.clone(),
                    content: paper.abstract_text.clone(),
                });
            } else if let Some(article) = articles.iter().find(|a| a.url == hit.url) {
                sources.push(EnrichedSource {
                    kind: SourceKind::Wikipedia,
                    url: article.url.clone(),
                    title: article.title.clone(),
                    content: article.summary.clone(),
                });
            } else {
                sources.push(EnrichedSource {
                    kind: SourceKind::Web,
                    url: hit.url.clone(),
                    title: hit.title.clone(),
                    content: hit.content.clone(),
                });
            }
        }

        for paper in papers {
            if !sources.iter().any(|s| s.url == paper.url) {
                sources.push(EnrichedSource {
                    kind: SourceKind::Arxiv,
                    url: paper.url.clone(),
                    title: paper.title.clone(),
                    content: paper.abstract_text.clone(),
                });
            }
        }
        for article in articles {
            if !sources.iter().any(|s| s.url == article.url) {
                sources.push(EnrichedSource {
                    kind: SourceKind::Wikipedia,
                    url: article.url.clone(),
                    title: article.title.clone(),
                    content: article.summary.clone(),
                });
            }
        }

        sources
    }

    fn format_sources_for_llm(sources: &[EnrichedSource]) -> String {
        sources
            .iter()
            .enumerate()
            .map(|(i, source)| {
                let label = match source.kind {
                    SourceKind::Arxiv => "[ArXiv Paper]",
                    SourceKind::Wikipedia => "[Wikipedia]",
                    SourceKind::Web => "[Web]",
                };
                let content: String = source.content.chars().take(500).collect();
                format!(
                    "{}. {} **{}**\n   URL: {}\n   Content: {}",
                    i + 1,
                    label,
                    source.title,
                    source.url,
                    content
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    async fn summarize(&self, task: &ResearchTask, sources: &[EnrichedSource]) -> Result<String> {
        let prompt = format!(
            r#"Synthesize the following research findings:

**Search Query**: {}

**Purpose**: {}

**Sources Found**:
{}

Provide a concise summary of the key findings relevant to the research purpose.
Note any academic papers, Wikipedia articles, or particularly authoritative sources.
Highlight any conflicting information if present."#,
            task.query,
            task.reasoning,
            Self::format_sources_for_llm(sources)
        );

        let response = self
            .llm
            .generate_with_system(RESEARCHER_SYSTEM_PROMPT, &prompt)
            .await?;
        let parsed: SummaryResponse = serde_json::from_str(extract_json(&response))
            .map_err(|e| AppError::Parse(format!("researcher returned invalid JSON: {}", e)))?;

        if parsed.key_points.is_empty() {
            return Ok(parsed.summary);
        }
        let points: Vec<String> = parsed
            .key_points
            .iter()
            .map(|p| format!("- {p}"))
            .collect();
        Ok(format!("{}\n\n{}", parsed.summary, points.join("\n")))
    }
}

#[async_trait]
impl Researcher for ResearcherAgent {
    async fn investigate(&self, task: &ResearchTask) -> Result<TaskFindings> {
        tracing::info!(task_id = %task.id, query = %task.query, "executing research task");

        let hits = self.search.search(&task.query).await?;

        let urls: Vec<&str> = hits.iter().map(|h| h.url.as_str()).collect();
        let classified = self.link_analyzer.classify(&urls);
        tracing::debug!(
            arxiv_count = classified.arxiv.len(),
            wikipedia_count = classified.wikipedia.len(),
            other_count = classified.other.len(),
            "urls classified"
        );

        let (papers, articles) = tokio::join!(
            self.arxiv.extract_papers(&classified.arxiv),
            self.wikipedia.extract_articles(&classified.wikipedia),
        );

        let sources = Self::build_sources(&hits, &papers, &articles);
        let summary = self.summarize(task, &sources).await?;

        tracing::info!(
            task_id = %task.id,
            source_count = sources.len(),
            paper_count = papers.len(),
            article_count = articles.len(),
            "research task complete"
        );

        Ok(TaskFindings {
            task_id: task.id.clone(),
            query: task.query.clone(),
            sources,
            summary,
            failure: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(url: &str) -> SearchHit {
        SearchHit {
            title: format!("hit {url}"),
            url: url.to_string(),
            content: "snippet".to_string(),
            score: 0.5,
        }
    }

    #[test]
    fn enriched_records_replace_matching_hits() {
        let hits = vec![hit("https://arxiv.org/abs/1"), hit("https://other.example")];
        let papers = vec![ArxivPaper {
            arxiv_id: "1".to_string(),
            title: "Paper".to_string(),
            authors: vec![],
            abstract_text: "abstract".to_string(),
            published: String::new(),
            url: "https://arxiv.org/abs/1".to_string(),
        }];

        let sources = ResearcherAgent::build_sources(&hits, &papers, &[]);
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].kind, SourceKind::Arxiv);
        assert_eq!(sources[0].content, "abstract");
        assert_eq!(sources[1].kind, SourceKind::Web);
    }

    #[test]
    fn unmatched_enrichments_are_appended() {
        let hits = vec![hit("https://other.example")];
        let articles = vec![WikiArticle {
            title: "Article".to_string(),
            url: "https://en.wikipedia.org/wiki/Article".to_string(),
            summary: "summary".to_string(),
        }];

        let sources = ResearcherAgent::build_sources(&hits, &[], &articles);
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[1].kind, SourceKind::Wikipedia);
    }

    #[test]
    fn source_formatting_truncates_long_content() {
        let long = EnrichedSource {
            kind: SourceKind::Web,
            url: "https://a.example".to_string(),
            title: "long".to_string(),
            content: "x".repeat(2000),
        };
        let formatted = ResearcherAgent::format_sources_for_llm(&[long]);
        assert!(formatted.len() < 700);
        assert!(formatted.contains("[Web]"));
    }
}
