//! Agent collaborators for the research pipeline
//!
//! The orchestrator drives four collaborators through narrow async traits:
//! [`Planner`], [`Researcher`], [`Writer`], and [`Editor`]. Each LLM-backed
//! implementation owns its prompts and response parsing; the orchestrator
//! only ever sees the typed result, never intermediate reasoning.

/// Draft review and scoring.
pub mod editor;
/// Research plan creation and replanning.
pub mod planner;
/// Task execution with search and enrichment.
pub mod researcher;
/// Report drafting and revision.
pub mod writer;

use crate::types::{
    Draft, EditorFeedback, ResearchFindings, ResearchPlan, ResearchTask, Result, TaskFindings,
};
use async_trait::async_trait;

pub use editor::EditorAgent;
pub use planner::PlannerAgent;
pub use researcher::ResearcherAgent;
pub use writer::WriterAgent;

/// Produces research plans for a question.
#[async_trait]
pub trait Planner: Send + Sync {
    /// Propose a plan for the question.
    ///
    /// On a replan round, `prior` is the rejected candidate and `feedback`
    /// explains the rejection; both are `None` on the first round. Must
    /// return at least one task or signal failure.
    async fn propose(
        &self,
        question: &str,
        prior: Option<&ResearchPlan>,
        feedback: Option<&str>,
    ) -> Result<ResearchPlan>;
}

/// Executes a single research task.
#[async_trait]
pub trait Researcher: Send + Sync {
    /// Gather findings for one task. A failure here is absorbed by the
    /// orchestrator as a degraded entry; it never aborts the run.
    async fn investigate(&self, task: &ResearchTask) -> Result<TaskFindings>;
}

/// Drafts and revises the report.
#[async_trait]
pub trait Writer: Send + Sync {
    /// Produce a draft from findings.
    ///
    /// With `prior` and `feedback` absent this is the initial draft
    /// (revision 0); otherwise a revision whose number is exactly
    /// `prior.revision + 1`.
    async fn draft(
        &self,
        question: &str,
        findings: &ResearchFindings,
        prior: Option<&Draft>,
        feedback: Option<&EditorFeedback>,
    ) -> Result<Draft>;
}

/// Reviews drafts against quality criteria.
#[async_trait]
pub trait Editor: Send + Sync {
    /// Score a draft and decide whether it is approved as-is.
    async fn review(&self, question: &str, draft: &Draft) -> Result<EditorFeedback>;
}

/// Strip markdown code fences from an LLM response so the JSON body can be
/// handed to serde. Models wrap structured output in ```json fences often
/// enough that every agent parses through this.
pub(crate) fn extract_json(response: &str) -> &str {
    let trimmed = response.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening fence line
    let body = match rest.split_once('\n') {
        Some((_, body)) => body,
        None => rest,
    };
    body.rsplit_once("```").map(|(body, _)| body).unwrap_or(body).trim()
}

#[cfg(test)]
pub(crate) mod test_support {
    //! A canned-response LLM for agent unit tests.

    use crate::llm::LLMClient;
    use crate::types::{AppError, Result};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Returns scripted responses in order, then errors.
    pub struct ScriptedLLM {
        responses: Mutex<Vec<String>>,
    }

    impl ScriptedLLM {
        pub fn new<S: Into<String>>(responses: Vec<S>) -> Self {
            let mut responses: Vec<String> = responses.into_iter().map(Into::into).collect();
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
            }
        }
    }

    #[async_trait]
    impl LLMClient for ScriptedLLM {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            self.responses
                .lock()
                .expect("script lock")
                .pop()
                .ok_or_else(|| AppError::Llm("script exhausted".to_string()))
        }

        async fn generate_with_system(&self, _system: &str, prompt: &str) -> Result<String> {
            self.generate(prompt).await
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::extract_json;

    #[test]
    fn extract_json_passes_bare_json_through() {
        assert_eq!(extract_json(" {\"a\": 1} "), "{\"a\": 1}");
    }

    #[test]
    fn extract_json_strips_fences() {
        let fenced = "```json\n{\"a\": 1}\n```";
        assert_eq!(extract_json(fenced), "{\"a\": 1}");
    }

    #[test]
    fn extract_json_strips_bare_fences() {
        let fenced = "```\n{\"a\": 1}\n```";
        assert_eq!(extract_json(fenced), "{\"a\": 1}");
    }
}
