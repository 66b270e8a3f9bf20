//! Editor agent - reviews drafts for quality, accuracy, and completeness

use crate::agents::{extract_json, Editor};
use crate::llm::LLMClient;
use crate::types::{AppError, Draft, EditorFeedback, Result};
use async_trait::async_trait;
use serde::Deserialize;

const EDITOR_SYSTEM_PROMPT: &str = r#"You are an expert research editor. Your job is to review research reports for quality, accuracy, and completeness.

Evaluate reports on these criteria:
1. Accuracy: Are claims well-supported by the cited sources?
2. Completeness: Does the report fully address the original question?
3. Clarity: Is the writing clear and well-organized?
4. Structure: Does it have proper sections, headings, and flow?
5. Citations: Are sources properly cited with links?
6. Objectivity: Is the content balanced and factual?

Be thorough but fair. Minor issues should not prevent approval if the overall quality is good.

Respond with JSON only, in this exact shape:
{"approved": true, "score": 8, "issues": ["<issue>"], "suggestions": ["<suggestion>"]}"#;

#[derive(Debug, Deserialize)]
struct ReviewResponse {
    approved: bool,
    score: i64,
    #[serde(default)]
    issues: Vec<String>,
    #[serde(default)]
    suggestions: Vec<String>,
}

/// LLM-backed editor.
pub struct EditorAgent {
    llm: Box<dyn LLMClient>,
}

impl EditorAgent {
    /// Create an editor on top of the given LLM client.
    pub fn new(llm: Box<dyn LLMClient>) -> Self {
        Self { llm }
    }

    fn parse_feedback(response: &str) -> Result<EditorFeedback> {
        let parsed: ReviewResponse = serde_json::from_str(extract_json(response))
            .map_err(|e| AppError::Parse(format!("editor returned invalid JSON: {}", e)))?;

        Ok(EditorFeedback {
            approved: parsed.approved,
            score: parsed.score.clamp(1, 10) as u8,
            issues: parsed.issues,
            suggestions: parsed.suggestions,
        })
    }
}

#[async_trait]
impl Editor for EditorAgent {
    async fn review(&self, question: &str, draft: &Draft) -> Result<EditorFeedback> {
        let prompt = format!(
            r#"Review the following research report:

**Original Question**: {question}

**Draft Report**:
{}

Evaluate this report on accuracy, completeness, clarity, structure, citations, and objectivity.

Provide:
- A score from 1-10
- Whether you approve (true/false)
- List of specific issues (if any)
- Suggestions for improvement (if not approved)"#,
            draft.content
        );

        let response = self
            .llm
            .generate_with_system(EDITOR_SYSTEM_PROMPT, &prompt)
            .await?;
        let feedback = Self::parse_feedback(&response)?;

        tracing::info!(
            approved = feedback.approved,
            score = feedback.score,
            issue_count = feedback.issues.len(),
            revision = draft.revision,
            "review complete"
        );
        Ok(feedback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn parses_review_json() {
        let feedback = EditorAgent::parse_feedback(
            r#"{"approved": false, "score": 5, "issues": ["thin evidence"], "suggestions": ["add citations"]}"#,
        )
        .unwrap();
        assert!(!feedback.approved);
        assert_eq!(feedback.score, 5);
        assert_eq!(feedback.issues, vec!["thin evidence"]);
    }

    #[rstest]
    #[case(0, 1)]
    #[case(-3, 1)]
    #[case(7, 7)]
    #[case(15, 10)]
    fn scores_are_clamped_into_range(#[case] raw: i64, #[case] expected: u8) {
        let json = format!(r#"{{"approved": false, "score": {raw}}}"#);
        let feedback = EditorAgent::parse_feedback(&json).unwrap();
        assert_eq!(feedback.score, expected);
    }

    #[test]
    fn missing_fields_are_a_parse_error() {
        assert!(EditorAgent::parse_feedback(r#"{"score": 5}"#).is_err());
    }
}
