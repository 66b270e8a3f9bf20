//! Core types for the research pipeline: plans, findings, drafts, reports,
//! and the error taxonomy shared by every stage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============= Plan Types =============

/// A single research task produced by the planner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResearchTask {
    /// Unique identifier within the plan (e.g. "task_1")
    pub id: String,
    /// The search query to execute
    pub query: String,
    /// Why this query is needed to answer the question
    pub reasoning: String,
}

/// An ordered research plan for a question.
///
/// The task order is significant: later tasks may assume context from earlier
/// ones when findings are eventually summarized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResearchPlan {
    /// The original user question
    pub question: String,
    /// Overall research strategy explanation
    pub strategy: String,
    /// Tasks in execution order
    pub tasks: Vec<ResearchTask>,
}

impl ResearchPlan {
    /// Validate the plan invariants: at least one task, unique task ids.
    ///
    /// Returns a human-readable description of the violation, suitable for
    /// feeding back to the planner as replan feedback.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.tasks.is_empty() {
            return Err("plan must contain at least one task".to_string());
        }
        let mut seen = std::collections::HashSet::new();
        for task in &self.tasks {
            if !seen.insert(task.id.as_str()) {
                return Err(format!("task ids must be unique (duplicate: '{}')", task.id));
            }
        }
        Ok(())
    }
}

/// The human reviewer's decision on a research plan.
///
/// Modeled as a tagged union so Approved and Modified are mutually exclusive
/// at the type level.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum PlanReview {
    /// Execute the candidate plan as-is
    Approved,
    /// Replace the candidate with a human-edited plan; counts as approval
    Modified(ResearchPlan),
    /// Send the plan back to the planner with feedback
    Rejected {
        /// Why the plan was rejected, fed back into the planner
        feedback: String,
    },
}

// ============= Findings Types =============

/// Which connector a source came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// General web search result
    Web,
    /// Enriched arXiv paper
    Arxiv,
    /// Enriched Wikipedia article
    Wikipedia,
}

/// A source after optional enrichment, tagged with its provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedSource {
    /// Provenance of the content
    pub kind: SourceKind,
    /// Source URL
    pub url: String,
    /// Source title
    pub title: String,
    /// Extracted content (snippet, abstract, or summary)
    pub content: String,
}

/// Extracted arXiv paper metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArxivPaper {
    /// arXiv paper id (e.g. "2301.00001")
    pub arxiv_id: String,
    /// Paper title
    pub title: String,
    /// Paper authors
    pub authors: Vec<String>,
    /// Paper abstract
    pub abstract_text: String,
    /// Publication date line as shown on the abstract page
    pub published: String,
    /// Canonical abstract-page URL
    pub url: String,
}

/// Extracted Wikipedia article summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WikiArticle {
    /// Article title
    pub title: String,
    /// Canonical article URL
    pub url: String,
    /// Article summary/intro
    pub summary: String,
}

/// The research output for a single task.
///
/// A degraded record (task failed, nothing found) carries the failure reason
/// and no sources; it still occupies the task's slot in the aggregate so the
/// writer sees one entry per planned task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskFindings {
    /// Id of the originating research task
    pub task_id: String,
    /// The search query that was executed
    pub query: String,
    /// All enriched sources gathered for this task
    pub sources: Vec<EnrichedSource>,
    /// LLM summary of the findings for this task
    pub summary: String,
    /// Failure reason when the task degraded instead of completing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl TaskFindings {
    /// Build a degraded placeholder record for a failed task.
    pub fn degraded(task: &ResearchTask, reason: impl Into<String>) -> Self {
        Self {
            task_id: task.id.clone(),
            query: task.query.clone(),
            sources: Vec::new(),
            summary: String::new(),
            failure: Some(reason.into()),
        }
    }

    /// Whether this record represents a failed task.
    pub fn is_degraded(&self) -> bool {
        self.failure.is_some()
    }
}

/// Aggregated findings for a whole plan, one record per task id in plan
/// order. Append-only: records are never mutated once inserted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResearchFindings {
    entries: Vec<TaskFindings>,
}

impl ResearchFindings {
    /// Create an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a completed task record.
    pub fn insert(&mut self, findings: TaskFindings) {
        self.entries.push(findings);
    }

    /// Look up a record by task id.
    pub fn get(&self, task_id: &str) -> Option<&TaskFindings> {
        self.entries.iter().find(|f| f.task_id == task_id)
    }

    /// Records in plan order.
    pub fn entries(&self) -> &[TaskFindings] {
        &self.entries
    }

    /// Number of task records.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no task records have been collected.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether every collected task degraded.
    pub fn all_degraded(&self) -> bool {
        !self.entries.is_empty() && self.entries.iter().all(|f| f.is_degraded())
    }

    /// All sources across tasks, deduplicated by URL, in first-seen order.
    pub fn sources(&self) -> Vec<EnrichedSource> {
        let mut seen = std::collections::HashSet::new();
        let mut out = Vec::new();
        for entry in &self.entries {
            for source in &entry.sources {
                if seen.insert(source.url.clone()) {
                    out.push(source.clone());
                }
            }
        }
        out
    }
}

// ============= Draft & Feedback Types =============

/// A versioned candidate report body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Draft {
    /// Report title
    pub title: String,
    /// Full markdown content
    pub content: String,
    /// Revision number: 0 for the initial draft, +1 per writer invocation
    pub revision: u32,
    /// The editor feedback that triggered this revision (None for v0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<EditorFeedback>,
}

/// The editor's review of a draft.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorFeedback {
    /// Whether the editor approves the draft as-is.
    ///
    /// Takes precedence over the numeric score: an explicit approval below
    /// the threshold is honored, never second-guessed.
    pub approved: bool,
    /// Quality score from 1 to 10
    pub score: u8,
    /// Specific issues found
    pub issues: Vec<String>,
    /// Suggestions for improvement
    pub suggestions: Vec<String>,
}

// ============= Report Types =============

/// The final research report returned by a completed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalReport {
    /// Report title
    pub title: String,
    /// Full markdown content
    pub content: String,
    /// All sources used, deduplicated by URL
    pub sources: Vec<EnrichedSource>,
    /// Number of writer revisions after the initial draft
    pub revisions: u32,
    /// The editor's final score
    pub score: u8,
    /// When the report was completed
    pub generated_at: DateTime<Utc>,
}

impl FinalReport {
    /// Assemble the report from the accepted draft and the run's findings.
    pub fn from_run(draft: Draft, findings: &ResearchFindings, score: u8) -> Self {
        Self {
            title: draft.title,
            content: draft.content,
            sources: findings.sources(),
            revisions: draft.revision,
            score,
            generated_at: Utc::now(),
        }
    }
}

// ============= Error Types =============

/// The pipeline stage a terminal error originated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Planning sub-loop (planner + human review gate)
    Planning,
    /// Task execution loop
    Research,
    /// Writer/editor reflection loop
    Writing,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Planning => write!(f, "planning"),
            Stage::Research => write!(f, "research"),
            Stage::Writing => write!(f, "writing"),
        }
    }
}

/// Error taxonomy for the research pipeline.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The human rejected the plan more times than allowed
    #[error("planning exhausted: plan rejected {rejections} time(s), limit is {limit}")]
    PlanningExhausted {
        /// How many rejection rounds occurred
        rejections: u32,
        /// The configured rejection limit
        limit: u32,
    },

    /// Every task in the approved plan degraded
    #[error("no findings: every research task in the plan failed")]
    NoFindings,

    /// A wrapped failure from an external collaborator
    #[error("collaborator failure: {0}")]
    Collaborator(String),

    /// LLM request or response failure
    #[error("LLM error: {0}")]
    Llm(String),

    /// Web search or enrichment failure
    #[error("search error: {0}")]
    Search(String),

    /// Structured output could not be parsed
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid or missing configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid input from the caller
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The user aborted the run at the review gate
    #[error("run aborted by user")]
    Aborted,

    /// A stage of the pipeline failed
    #[error("{stage} stage failed: {source}")]
    Stage {
        /// Which stage failed
        stage: Stage,
        /// The underlying failure
        #[source]
        source: Box<AppError>,
    },

    /// I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Attach stage context to an error.
    ///
    /// Errors that already identify their stage (`PlanningExhausted`,
    /// `NoFindings`, `Aborted`) pass through unwrapped so the user sees a
    /// single clear message.
    pub fn in_stage(self, stage: Stage) -> Self {
        match self {
            AppError::PlanningExhausted { .. }
            | AppError::NoFindings
            | AppError::Aborted
            | AppError::Stage { .. } => self,
            other => AppError::Stage {
                stage,
                source: Box::new(other),
            },
        }
    }

    /// The stage this error identifies, if any.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            AppError::PlanningExhausted { .. } => Some(Stage::Planning),
            AppError::NoFindings => Some(Stage::Research),
            AppError::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AppError>;
