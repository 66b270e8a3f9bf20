//! Writer agent - drafts and revises markdown reports from findings

use crate::agents::{extract_json, Writer};
use crate::llm::LLMClient;
use crate::types::{
    AppError, Draft, EditorFeedback, ResearchFindings, Result, SourceKind, TaskFindings,
};
use async_trait::async_trait;
use serde::Deserialize;

const WRITER_SYSTEM_PROMPT: &str = r#"You are an expert research writer. Your job is to synthesize research findings into a well-structured, comprehensive markdown report.

Your reports should:
1. Have a clear, descriptive title
2. Include an executive summary/introduction
3. Be organized with logical sections and headings
4. Cite sources appropriately with links
5. Include a references section at the end
6. Be written in an accessible but professional tone

Respond with JSON only, in this exact shape:
{"title": "<report title>", "content": "<full markdown content>"}"#;

#[derive(Debug, Deserialize)]
struct DraftResponse {
    title: String,
    content: String,
}

/// LLM-backed writer.
pub struct WriterAgent {
    llm: Box<dyn LLMClient>,
}

impl WriterAgent {
    /// Create a writer on top of the given LLM client.
    pub fn new(llm: Box<dyn LLMClient>) -> Self {
        Self { llm }
    }

    fn format_findings(findings: &ResearchFindings) -> String {
        let mut parts = Vec::new();
        for entry in findings.entries() {
            parts.push(Self::format_entry(entry));
        }
        parts.join("\n---\n\n")
    }

    fn format_entry(entry: &TaskFindings) -> String {
        if let Some(reason) = &entry.failure {
            return format!(
                "## Research Task: {}\n\n(This task failed: {}. No sources available.)\n",
                entry.query, reason
            );
        }

        let mut parts = vec![
            format!("## Research Task: {}\n", entry.query),
            format!("**Summary**: {}\n", entry.summary),
            "**Sources:**".to_string(),
        ];
        for source in &entry.sources {
            let label = match source.kind {
                SourceKind::Arxiv => "[ARXIV]",
                SourceKind::Wikipedia => "[WIKIPEDIA]",
                SourceKind::Web => "[WEB]",
            };
            parts.push(format!("- {} [{}]({})", label, source.title, source.url));
        }
        parts.join("\n")
    }

    fn initial_prompt(question: &str, findings: &ResearchFindings) -> String {
        format!(
            r#"Write a comprehensive research report based on the following:

**Original Question**: {question}

**Research Findings**:
{}

Create a well-structured markdown report that:
1. Directly answers the original question
2. Synthesizes information from all sources
3. Is organized logically with clear sections
4. Cites sources with links where available
5. Includes a references section at the end"#,
            Self::format_findings(findings)
        )
    }

    fn revision_prompt(question: &str, prior: &Draft, feedback: &EditorFeedback) -> String {
        let mut feedback_parts = vec![format!("**Score**: {}/10", feedback.score)];
        if !feedback.issues.is_empty() {
            feedback_parts.push("\n**Issues Found:**".to_string());
            for issue in &feedback.issues {
                feedback_parts.push(format!("- {issue}"));
            }
        }
        if !feedback.suggestions.is_empty() {
            feedback_parts.push("\n**Suggestions for Improvement:**".to_string());
            for suggestion in &feedback.suggestions {
                feedback_parts.push(format!("- {suggestion}"));
            }
        }

        format!(
            r#"Revise the following research report based on editor feedback:

**Original Question**: {question}

**Current Draft**:
{}

**Editor Feedback**:
{}

Revise the report to address all the feedback while maintaining the overall structure and accuracy.
Ensure all sources are still properly cited."#,
            prior.content,
            feedback_parts.join("\n")
        )
    }
}

#[async_trait]
impl Writer for WriterAgent {
    async fn draft(
        &self,
        question: &str,
        findings: &ResearchFindings,
        prior: Option<&Draft>,
        feedback: Option<&EditorFeedback>,
    ) -> Result<Draft> {
        let prompt = match (prior, feedback) {
            (Some(prior), Some(feedback)) => Self::revision_prompt(question, prior, feedback),
            _ => Self::initial_prompt(question, findings),
        };

        let response = self
            .llm
            .generate_with_system(WRITER_SYSTEM_PROMPT, &prompt)
            .await?;
        let parsed: DraftResponse = serde_json::from_str(extract_json(&response))
            .map_err(|e| AppError::Parse(format!("writer returned invalid JSON: {}", e)))?;

        let revision = prior.map(|d| d.revision + 1).unwrap_or(0);
        tracing::info!(
            revision,
            content_length = parsed.content.len(),
            "draft complete"
        );

        Ok(Draft {
            title: parsed.title,
            content: parsed.content,
            revision,
            feedback: feedback.cloned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::test_support::ScriptedLLM;
    use crate::types::TaskFindings;

    const DRAFT_JSON: &str = r##"{"title": "Report", "content": "# Report\n\nBody."}"##;

    fn findings() -> ResearchFindings {
        let mut findings = ResearchFindings::new();
        findings.insert(TaskFindings {
            task_id: "task_1".to_string(),
            query: "q1".to_string(),
            sources: vec![],
            summary: "s1".to_string(),
            failure: None,
        });
        findings
    }

    fn feedback(score: u8) -> EditorFeedback {
        EditorFeedback {
            approved: false,
            score,
            issues: vec!["missing citations".to_string()],
            suggestions: vec![],
        }
    }

    #[tokio::test]
    async fn initial_draft_is_revision_zero() {
        let writer = WriterAgent::new(Box::new(ScriptedLLM::new(vec![DRAFT_JSON])));
        let draft = writer.draft("q", &findings(), None, None).await.unwrap();
        assert_eq!(draft.revision, 0);
        assert!(draft.feedback.is_none());
    }

    #[tokio::test]
    async fn revision_increments_by_one_and_records_feedback() {
        let writer = WriterAgent::new(Box::new(ScriptedLLM::new(vec![DRAFT_JSON, DRAFT_JSON])));
        let v0 = writer.draft("q", &findings(), None, None).await.unwrap();
        let fb = feedback(5);
        let v1 = writer
            .draft("q", &findings(), Some(&v0), Some(&fb))
            .await
            .unwrap();
        assert_eq!(v1.revision, 1);
        assert_eq!(v1.feedback.as_ref().map(|f| f.score), Some(5));
    }

    #[test]
    fn degraded_entries_are_flagged_in_the_prompt() {
        let mut findings = ResearchFindings::new();
        findings.insert(TaskFindings {
            task_id: "task_1".to_string(),
            query: "broken".to_string(),
            sources: vec![],
            summary: String::new(),
            failure: Some("search error: no results".to_string()),
        });
        let formatted = WriterAgent::format_findings(&findings);
        assert!(formatted.contains("This task failed"));
        assert!(formatted.contains("no results"));
    }
}
