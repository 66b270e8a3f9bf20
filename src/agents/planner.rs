//! Planner agent - creates research plans with ReAct-style prompting

use crate::agents::{extract_json, Planner};
use crate::llm::LLMClient;
use crate::types::{AppError, ResearchPlan, ResearchTask, Result};
use async_trait::async_trait;
use serde::Deserialize;

const PLANNER_SYSTEM_PROMPT: &str = r#"You are a research planning expert. Your job is to create a comprehensive research plan to answer the user's question.

You use the ReAct (Reasoning + Acting) pattern:
1. Thought: Analyze what information is needed to answer the question
2. Action: Decide what search queries will gather that information
3. Observation: Reflect on whether your plan is complete

Key principles:
- Break complex questions into focused search queries
- Each query should target a specific aspect of the question
- Plan queries that will yield academic papers, encyclopedic content, and current information
- Each task should have clear reasoning explaining why it is needed

Aim for 3-5 focused queries that together will comprehensively answer the question.

Respond with JSON only, in this exact shape:
{
  "strategy": "<overall research strategy>",
  "tasks": [
    {"id": "task_1", "query": "<search query>", "reasoning": "<why this query is needed>"}
  ]
}"#;

#[derive(Debug, Deserialize)]
struct PlanResponse {
    #[serde(default)]
    strategy: String,
    #[serde(default)]
    tasks: Vec<TaskResponse>,
}

#[derive(Debug, Deserialize)]
struct TaskResponse {
    id: String,
    query: String,
    #[serde(default)]
    reasoning: String,
}

/// LLM-backed planner.
pub struct PlannerAgent {
    llm: Box<dyn LLMClient>,
}

impl PlannerAgent {
    /// Create a planner on top of the given LLM client.
    pub fn new(llm: Box<dyn LLMClient>) -> Self {
        Self { llm }
    }

    fn initial_prompt(question: &str) -> String {
        format!(
            r#"Create a research plan to answer the following question:

**Question**: {question}

Apply the ReAct pattern:
1. Thought: What aspects of this question need to be researched?
2. Action: What specific search queries will gather the needed information?
3. Observation: Is this plan complete? Does it cover all aspects?"#
        )
    }

    fn replan_prompt(question: &str, prior: &ResearchPlan, feedback: &str) -> String {
        let prior_queries: Vec<String> = prior
            .tasks
            .iter()
            .map(|t| format!("- {} ({})", t.query, t.id))
            .collect();
        format!(
            r#"The previous research plan was rejected. Please create a new plan.

**Original Question**: {question}

**Previous Plan Queries**:
{}

**Feedback**: {feedback}

Apply the ReAct pattern again, incorporating the feedback:
1. Thought: What was wrong with the previous approach? How can I address the feedback?
2. Action: What revised search queries will better answer the question?
3. Observation: Does this new plan address the feedback?"#,
            prior_queries.join("\n")
        )
    }

    fn parse_plan(question: &str, response: &str) -> Result<ResearchPlan> {
        let parsed: PlanResponse = serde_json::from_str(extract_json(response))
            .map_err(|e| AppError::Parse(format!("planner returned invalid JSON: {}", e)))?;

        Ok(ResearchPlan {
            question: question.to_string(),
            strategy: parsed.strategy,
            tasks: parsed
                .tasks
                .into_iter()
                .map(|t| ResearchTask {
                    id: t.id,
                    query: t.query,
                    reasoning: t.reasoning,
                })
                .collect(),
        })
    }
}

#[async_trait]
impl Planner for PlannerAgent {
    async fn propose(
        &self,
        question: &str,
        prior: Option<&ResearchPlan>,
        feedback: Option<&str>,
    ) -> Result<ResearchPlan> {
        let prompt = match (prior, feedback) {
            (Some(prior), Some(feedback)) => Self::replan_prompt(question, prior, feedback),
            (None, Some(feedback)) => format!(
                "{}\n\nAdditional requirement: {}",
                Self::initial_prompt(question),
                feedback
            ),
            _ => Self::initial_prompt(question),
        };

        let response = self
            .llm
            .generate_with_system(PLANNER_SYSTEM_PROMPT, &prompt)
            .await?;
        let plan = Self::parse_plan(question, &response)?;

        tracing::info!(
            task_count = plan.tasks.len(),
            replan = prior.is_some(),
            "research plan created"
        );
        Ok(plan)
    }
}
