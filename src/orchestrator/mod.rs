//! Workflow orchestrator
//!
//! Owns the control flow for one research run: the planning sub-loop with its
//! human-approval checkpoint, the task execution loop, and the bounded
//! writer/editor reflection loop. Collaborators are black boxes behind narrow
//! traits; the orchestrator only sequences them and enforces the run's
//! termination conditions.
//!
//! A run is a single in-memory flow. Dropping the future returned by
//! [`Orchestrator::run`] cancels the in-flight collaborator call and discards
//! the run state; nothing partial is ever returned.

use crate::agents::{Editor, Planner, Researcher, Writer};
use crate::hitl::ReviewGate;
use crate::types::{
    AppError, Draft, EditorFeedback, FinalReport, PlanReview, ResearchFindings, ResearchPlan,
    Result, Stage, TaskFindings,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::task::JoinSet;
use uuid::Uuid;

/// Immutable configuration for one orchestrator.
///
/// Passed in explicitly rather than read from ambient process state so runs
/// are independently testable in parallel.
#[derive(Debug, Clone, Copy)]
pub struct OrchestratorConfig {
    /// Maximum human plan rejections before `PlanningExhausted`
    pub max_plan_attempts: u32,
    /// Maximum writer revisions after the initial draft (soft cap)
    pub max_reflection_iterations: u32,
    /// Editor score (1-10) at which a draft auto-approves
    pub approval_threshold: u8,
    /// Execute research tasks concurrently instead of in plan order
    pub parallel_tasks: bool,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_plan_attempts: 3,
            max_reflection_iterations: 3,
            approval_threshold: 7,
            parallel_tasks: false,
        }
    }
}

/// Working memory for one run.
///
/// Created at run start, discarded at run end; the orchestrator is its only
/// writer. Collaborators receive copies or read-only views of the subset they
/// need.
#[derive(Debug)]
struct RunState {
    run_id: Uuid,
    question: String,
    plan: Option<ResearchPlan>,
    findings: Option<ResearchFindings>,
    draft: Option<Draft>,
    plan_rejections: u32,
    reflection_iterations: u32,
}

impl RunState {
    fn new(question: &str) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            question: question.to_string(),
            plan: None,
            findings: None,
            draft: None,
            plan_rejections: 0,
            reflection_iterations: 0,
        }
    }
}

/// States of the writer/editor reflection loop.
enum ReflectionState {
    /// Initial draft from findings only
    Drafting,
    /// Editor reviews the current draft
    Reviewing(Draft),
    /// Writer revises the draft against the feedback
    Revising(Draft, EditorFeedback),
    /// Terminal: the draft and the verdict that ended the loop
    Done(Draft, EditorFeedback),
}

/// Coordinates planner, review gate, researcher, writer, and editor through
/// one research run.
pub struct Orchestrator {
    planner: Box<dyn Planner>,
    gate: Box<dyn ReviewGate>,
    researcher: Arc<dyn Researcher>,
    writer: Box<dyn Writer>,
    editor: Box<dyn Editor>,
    config: OrchestratorConfig,
}

impl Orchestrator {
    /// Assemble an orchestrator from its collaborators and configuration.
    pub fn new(
        planner: Box<dyn Planner>,
        gate: Box<dyn ReviewGate>,
        researcher: Arc<dyn Researcher>,
        writer: Box<dyn Writer>,
        editor: Box<dyn Editor>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            planner,
            gate,
            researcher,
            writer,
            editor,
            config,
        }
    }

    /// Run the complete research workflow for a question.
    ///
    /// The three phases compose strictly sequentially: research never starts
    /// before a plan is approved, and writing never starts before every task
    /// has been attempted. Any stage failure aborts the run with a single
    /// terminal error identifying the stage; partial state is discarded.
    pub async fn run(&self, question: &str) -> Result<FinalReport> {
        if question.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "research question must not be empty".to_string(),
            ));
        }

        let mut run = RunState::new(question);
        tracing::info!(run_id = %run.run_id, question, "workflow start");

        // Phase 1: planning with human review
        let plan = self
            .obtain_approved_plan(&mut run)
            .await
            .map_err(|e| e.in_stage(Stage::Planning))?;
        run.plan = Some(plan.clone());

        // Phase 2: research
        let findings = self
            .execute_plan(&plan)
            .await
            .map_err(|e| e.in_stage(Stage::Research))?;
        run.findings = Some(findings.clone());

        // Phase 3: writing with reflection loop
        let (draft, verdict) = self
            .refine(&mut run, &findings)
            .await
            .map_err(|e| e.in_stage(Stage::Writing))?;

        let report = FinalReport::from_run(draft, &findings, verdict.score);
        tracing::info!(
            run_id = %run.run_id,
            revisions = report.revisions,
            score = report.score,
            source_count = report.sources.len(),
            "workflow complete"
        );
        Ok(report)
    }

    /// Planning sub-loop: propose, review, replan until approval.
    ///
    /// A Modified review returns the human's plan directly; modification is
    /// implicit approval and no further review round is performed. Invalid
    /// candidate plans (no tasks, duplicate ids) force a replan with
    /// synthesized feedback without consuming a human-review round; they are
    /// bounded separately so a broken planner cannot loop forever.
    async fn obtain_approved_plan(&self, run: &mut RunState) -> Result<ResearchPlan> {
        let mut prior: Option<ResearchPlan> = None;
        let mut feedback: Option<String> = None;
        let mut invalid_rounds: u32 = 0;

        loop {
            let candidate = self
                .planner
                .propose(&run.question, prior.as_ref(), feedback.as_deref())
                .await?;

            if let Err(violation) = candidate.validate() {
                invalid_rounds += 1;
                tracing::warn!(%violation, invalid_rounds, "planner produced an invalid plan");
                if invalid_rounds >= self.config.max_plan_attempts {
                    return Err(AppError::Collaborator(format!(
                        "planner kept producing invalid plans: {}",
                        violation
                    )));
                }
                feedback = Some(violation);
                prior = Some(candidate);
                continue;
            }

            // The gate may suspend indefinitely awaiting input; no timeout
            // is imposed here.
            match self.gate.review(&candidate).await? {
                PlanReview::Approved => {
                    tracing::info!(task_count = candidate.tasks.len(), "plan approved");
                    return Ok(candidate);
                }
                PlanReview::Modified(modified) => {
                    modified.validate().map_err(AppError::InvalidInput)?;
                    tracing::info!(task_count = modified.tasks.len(), "using modified plan");
                    return Ok(modified);
                }
                PlanReview::Rejected {
                    feedback: human_feedback,
                } => {
                    run.plan_rejections += 1;
                    tracing::info!(
                        rejections = run.plan_rejections,
                        limit = self.config.max_plan_attempts,
                        "plan rejected"
                    );
                    if run.plan_rejections >= self.config.max_plan_attempts {
                        return Err(AppError::PlanningExhausted {
                            rejections: run.plan_rejections,
                            limit: self.config.max_plan_attempts,
                        });
                    }
                    feedback = Some(human_feedback);
                    prior = Some(candidate);
                }
            }
        }
    }

    /// Task execution loop: one researcher call per task, failures absorbed.
    ///
    /// Returns findings with exactly one entry per task id, in plan order,
    /// degraded entries included. Fails with `NoFindings` only when every
    /// task degraded.
    async fn execute_plan(&self, plan: &ResearchPlan) -> Result<ResearchFindings> {
        let mut findings = ResearchFindings::new();

        if self.config.parallel_tasks {
            self.execute_parallel(plan, &mut findings).await?;
        } else {
            for task in &plan.tasks {
                let entry = match self.researcher.investigate(task).await {
                    Ok(entry) => entry,
                    Err(e) => {
                        tracing::warn!(task_id = %task.id, error = %e, "research task degraded");
                        TaskFindings::degraded(task, e.to_string())
                    }
                };
                findings.insert(entry);
            }
        }

        if findings.all_degraded() {
            return Err(AppError::NoFindings);
        }
        tracing::info!(task_count = findings.len(), "research complete");
        Ok(findings)
    }

    /// Concurrent fan-out variant of the task loop.
    ///
    /// Each task absorbs its own failure before returning, so a degraded
    /// task never cancels siblings; results merge keyed by plan position so
    /// the outcome is deterministic regardless of completion order.
    async fn execute_parallel(
        &self,
        plan: &ResearchPlan,
        findings: &mut ResearchFindings,
    ) -> Result<()> {
        let mut set = JoinSet::new();
        for (position, task) in plan.tasks.iter().enumerate() {
            let researcher = Arc::clone(&self.researcher);
            let task = task.clone();
            set.spawn(async move {
                let entry = match researcher.investigate(&task).await {
                    Ok(entry) => entry,
                    Err(e) => {
                        tracing::warn!(task_id = %task.id, error = %e, "research task degraded");
                        TaskFindings::degraded(&task, e.to_string())
                    }
                };
                (position, entry)
            });
        }

        let mut by_position = BTreeMap::new();
        while let Some(joined) = set.join_next().await {
            let (position, entry) = joined
                .map_err(|e| AppError::Collaborator(format!("research task aborted: {}", e)))?;
            by_position.insert(position, entry);
        }
        for (_, entry) in by_position {
            findings.insert(entry);
        }
        Ok(())
    }

    /// Reflection loop: draft, review, revise until approval or budget
    /// exhaustion.
    ///
    /// The editor's boolean approval takes precedence over the numeric
    /// threshold and is never second-guessed. Exhausting the iteration
    /// budget is a soft cap: the last draft is returned as-is.
    async fn refine(
        &self,
        run: &mut RunState,
        findings: &ResearchFindings,
    ) -> Result<(Draft, EditorFeedback)> {
        let mut state = ReflectionState::Drafting;

        loop {
            state = match state {
                ReflectionState::Drafting => {
                    let draft = self
                        .writer
                        .draft(&run.question, findings, None, None)
                        .await?;
                    ReflectionState::Reviewing(draft)
                }

                ReflectionState::Reviewing(draft) => {
                    let verdict = self.editor.review(&run.question, &draft).await?;
                    if verdict.approved {
                        tracing::info!(score = verdict.score, "draft approved by editor");
                        ReflectionState::Done(draft, verdict)
                    } else if verdict.score >= self.config.approval_threshold {
                        tracing::info!(
                            score = verdict.score,
                            threshold = self.config.approval_threshold,
                            "draft meets quality threshold"
                        );
                        ReflectionState::Done(draft, verdict)
                    } else if run.reflection_iterations < self.config.max_reflection_iterations {
                        ReflectionState::Revising(draft, verdict)
                    } else {
                        tracing::warn!(
                            iterations = run.reflection_iterations,
                            "iteration budget exhausted, returning current draft"
                        );
                        ReflectionState::Done(draft, verdict)
                    }
                }

                ReflectionState::Revising(draft, verdict) => {
                    let revised = self
                        .writer
                        .draft(&run.question, findings, Some(&draft), Some(&verdict))
                        .await?;
                    run.reflection_iterations += 1;
                    ReflectionState::Reviewing(revised)
                }

                ReflectionState::Done(draft, verdict) => {
                    run.draft = Some(draft.clone());
                    return Ok((draft, verdict));
                }
            };
        }
    }
}
