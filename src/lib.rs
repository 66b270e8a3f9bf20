//! # S.A.G.E - Self-correcting Agent for Grounded Exposition
//!
//! A reflective research agent built in Rust: given a question, it plans the
//! research, checks the plan with a human, gathers evidence from the web with
//! arXiv/Wikipedia enrichment, and drafts a report that a writer/editor loop
//! refines against quality criteria before returning it.
//!
//! ## Overview
//!
//! SAGE can be used in two ways:
//!
//! 1. **As a CLI** - Run the `sage` binary with a research question
//! 2. **As a library** - Embed the pipeline in your own Rust project
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use sage::{Orchestrator, OrchestratorConfig, Settings};
//! use sage::agents::{EditorAgent, PlannerAgent, ResearcherAgent, WriterAgent};
//! use sage::hitl::AutoApproveGate;
//! use sage::llm::OpenAIClient;
//! use sage::tools::{ArxivExtractor, TavilyClient, WikipediaExtractor};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = Settings::from_env()?;
//!     let llm = || Box::new(OpenAIClient::new(&settings.openai_api_key, &settings.model_name));
//!
//!     let orchestrator = Orchestrator::new(
//!         Box::new(PlannerAgent::new(llm())),
//!         Box::new(AutoApproveGate),
//!         Arc::new(ResearcherAgent::new(
//!             llm(),
//!             TavilyClient::new(&settings.tavily_api_key, settings.max_search_results),
//!             ArxivExtractor::new(),
//!             WikipediaExtractor::new(),
//!         )),
//!         Box::new(WriterAgent::new(llm())),
//!         Box::new(EditorAgent::new(llm())),
//!         settings.orchestrator_config(false),
//!     );
//!
//!     let report = orchestrator.run("How do transformers work?").await?;
//!     println!("{}", report.content);
//!     Ok(())
//! }
//! ```
//!
//! ## Workflow
//!
//! 1. **Planning** - The planner proposes search tasks; a human approves,
//!    edits, or rejects the plan (rejections replan with feedback, bounded)
//! 2. **Research** - One researcher call per task; web search plus
//!    conditional arXiv/Wikipedia enrichment; failed tasks degrade instead of
//!    aborting the run
//! 3. **Writing** - The writer drafts from the findings; the editor scores
//!    each draft, and the loop revises until approval, the quality threshold,
//!    or the iteration budget
//!
//! ## Modules
//!
//! - [`orchestrator`] - The run driver: state machine, loops, termination
//! - [`agents`] - Collaborator traits and LLM-backed implementations
//! - [`hitl`] - Human plan review gate
//! - [`llm`] - LLM client abstraction
//! - [`tools`] - Search and enrichment connectors
//! - [`types`] - Data model and error taxonomy
//! - [`cli`] - Terminal surface for the `sage` binary
//! - [`utils`] - Environment-based configuration

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

/// Agent collaborators: planner, researcher, writer, editor.
pub mod agents;
/// CLI argument parsing and terminal output.
pub mod cli;
/// Human-in-the-loop plan review.
pub mod hitl;
/// LLM provider clients and abstractions.
pub mod llm;
/// The workflow orchestrator.
pub mod orchestrator;
/// Research connectors (search, arXiv, Wikipedia).
pub mod tools;
/// Core types (plans, findings, reports, errors).
pub mod types;
/// Configuration utilities.
pub mod utils;

// Re-export commonly used types
pub use agents::{Editor, Planner, Researcher, Writer};
pub use hitl::ReviewGate;
pub use llm::LLMClient;
pub use orchestrator::{Orchestrator, OrchestratorConfig};
pub use types::{
    AppError, Draft, EditorFeedback, FinalReport, PlanReview, ResearchFindings, ResearchPlan,
    ResearchTask, Result, Stage,
};
pub use utils::Settings;
