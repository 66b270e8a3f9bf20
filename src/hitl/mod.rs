//! Human-in-the-loop plan review
//!
//! The review gate is an interactive boundary: it may suspend indefinitely
//! waiting for input, and the orchestrator never imposes a timeout on it.
//! [`ConsoleReviewer`] drives approve/modify/reject from the terminal;
//! [`AutoApproveGate`] waves every plan through for unattended runs.

use crate::cli::output::Output;
use crate::types::{AppError, PlanReview, ResearchPlan, ResearchTask, Result};
use async_trait::async_trait;
use owo_colors::OwoColorize;
use std::io::{self, BufRead, Write};

/// Decides the fate of a candidate research plan.
#[async_trait]
pub trait ReviewGate: Send + Sync {
    /// Review a plan and return the human's decision.
    async fn review(&self, plan: &ResearchPlan) -> Result<PlanReview>;
}

/// Interactive console reviewer.
pub struct ConsoleReviewer {
    output: Output,
}

impl ConsoleReviewer {
    /// Create a reviewer writing through the given output helper.
    pub fn new(output: Output) -> Self {
        Self { output }
    }

    fn display_plan(&self, plan: &ResearchPlan) {
        println!();
        if self.output.colored {
            println!(
                "{} {}",
                "Research Plan for:".blue().bold(),
                plan.question.bright_white()
            );
            println!("{} {}", "Strategy:".bold(), plan.strategy);
        } else {
            println!("Research Plan for: {}", plan.question);
            println!("Strategy: {}", plan.strategy);
        }
        println!();
        for (i, task) in plan.tasks.iter().enumerate() {
            if self.output.colored {
                println!(
                    "  {} {}",
                    format!("{}.", i + 1).dimmed(),
                    task.query.green()
                );
                println!("     {}", task.reasoning.dimmed());
            } else {
                println!("  {}. {}", i + 1, task.query);
                println!("     {}", task.reasoning);
            }
        }
        println!();
    }

    async fn get_decision(&self) -> Result<char> {
        self.output.info("Options:");
        self.output.info("  [a]pprove - execute the plan as-is");
        self.output.info("  [m]odify  - edit the plan tasks");
        self.output.info("  [r]eject  - reject and provide feedback for replanning");
        self.output.info("  [q]uit    - abort the run");

        loop {
            let answer = read_line("Your decision [a/m/r/q] (a): ").await?;
            let answer = answer.to_lowercase();
            match answer.as_str() {
                "" | "a" | "approve" => return Ok('a'),
                "m" | "modify" => return Ok('m'),
                "r" | "reject" => return Ok('r'),
                "q" | "quit" => return Ok('q'),
                other => self.output.warning(&format!("unrecognized choice '{other}'")),
            }
        }
    }

    async fn edit_plan(&self, plan: &ResearchPlan) -> Result<ResearchPlan> {
        self.output
            .info("Editing plan: enter a new query, press Enter to keep, or type 'delete' to drop a task.");

        let mut tasks = Vec::new();
        for (i, task) in plan.tasks.iter().enumerate() {
            println!("  Task {}: {}", i + 1, task.query);
            let answer = read_line("  New query (Enter to keep): ").await?;
            if answer.eq_ignore_ascii_case("delete") {
                continue;
            }
            let query = if answer.is_empty() {
                task.query.clone()
            } else {
                answer
            };
            tasks.push(ResearchTask {
                id: task.id.clone(),
                query,
                reasoning: task.reasoning.clone(),
            });
        }

        loop {
            let answer = read_line("Add another task? [y/N]: ").await?;
            if !answer.eq_ignore_ascii_case("y") {
                break;
            }
            let query = read_line("  Query: ").await?;
            if query.is_empty() {
                self.output.warning("empty query, skipping");
                continue;
            }
            let reasoning = read_line("  Reasoning: ").await?;
            tasks.push(ResearchTask {
                id: fresh_task_id(&tasks),
                query,
                reasoning,
            });
        }

        Ok(ResearchPlan {
            question: plan.question.clone(),
            strategy: plan.strategy.clone(),
            tasks,
        })
    }
}

#[async_trait]
impl ReviewGate for ConsoleReviewer {
    async fn review(&self, plan: &ResearchPlan) -> Result<PlanReview> {
        tracing::info!(task_count = plan.tasks.len(), "human review start");
        self.display_plan(plan);

        match self.get_decision().await? {
            'a' => {
                self.output.success("Plan approved");
                Ok(PlanReview::Approved)
            }
            'm' => {
                let modified = self.edit_plan(plan).await?;
                if modified.tasks.is_empty() {
                    return Err(AppError::InvalidInput(
                        "modified plan contains no tasks".to_string(),
                    ));
                }
                self.output.success("Using modified plan");
                Ok(PlanReview::Modified(modified))
            }
            'r' => {
                self.output.warning("Plan rejected");
                let feedback =
                    read_line("Feedback to help improve the plan: ").await?;
                Ok(PlanReview::Rejected { feedback })
            }
            _ => Err(AppError::Aborted),
        }
    }
}

/// Non-interactive gate that approves every plan. Used by `--auto-approve`
/// and unattended runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoApproveGate;

#[async_trait]
impl ReviewGate for AutoApproveGate {
    async fn review(&self, plan: &ResearchPlan) -> Result<PlanReview> {
        tracing::info!(task_count = plan.tasks.len(), "auto-approving plan");
        Ok(PlanReview::Approved)
    }
}

/// Next "task_N" id not already taken by a kept task.
fn fresh_task_id(tasks: &[ResearchTask]) -> String {
    let mut n = tasks.len() + 1;
    loop {
        let id = format!("task_{n}");
        if !tasks.iter().any(|t| t.id == id) {
            return id;
        }
        n += 1;
    }
}

/// Prompt on stdout and read one line from stdin.
///
/// Runs on the blocking pool so an idle human never stalls the runtime. EOF
/// (closed stdin) is treated as an abort rather than an implicit approval.
async fn read_line(prompt: &str) -> Result<String> {
    let prompt = prompt.to_string();
    tokio::task::spawn_blocking(move || {
        print!("{prompt}");
        io::stdout().flush()?;
        let mut line = String::new();
        let bytes = io::stdin().lock().read_line(&mut line)?;
        Ok::<Option<String>, std::io::Error>(if bytes == 0 {
            None
        } else {
            Some(line.trim().to_string())
        })
    })
    .await
    .map_err(|e| AppError::Collaborator(format!("review prompt task failed: {e}")))??
    .ok_or(AppError::Aborted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn auto_approve_gate_approves() {
        let plan = ResearchPlan {
            question: "q".to_string(),
            strategy: "s".to_string(),
            tasks: vec![ResearchTask {
                id: "task_1".to_string(),
                query: "x".to_string(),
                reasoning: "y".to_string(),
            }],
        };
        let review = AutoApproveGate.review(&plan).await.unwrap();
        assert!(matches!(review, PlanReview::Approved));
    }

    #[test]
    fn fresh_task_ids_skip_taken_slots() {
        let tasks = vec![
            ResearchTask {
                id: "task_2".to_string(),
                query: "x".to_string(),
                reasoning: "y".to_string(),
            },
            ResearchTask {
                id: "task_3".to_string(),
                query: "x".to_string(),
                reasoning: "y".to_string(),
            },
        ];
        assert_eq!(fresh_task_id(&tasks), "task_4");
        assert_eq!(fresh_task_id(&[]), "task_1");
    }
}
