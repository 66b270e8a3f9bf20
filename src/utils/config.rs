//! Application settings loaded from environment variables
//!
//! A `.env` file in the working directory is honored via `dotenvy`. All
//! pipeline knobs have defaults; only the API keys are required.

use crate::orchestrator::OrchestratorConfig;
use crate::types::{AppError, Result};
use std::env;

/// Application settings, fixed for the lifetime of a run.
#[derive(Debug, Clone)]
pub struct Settings {
    /// API key for the OpenAI-compatible endpoint
    pub openai_api_key: String,
    /// API key for Tavily web search
    pub tavily_api_key: String,
    /// Model name for all agents
    pub model_name: String,
    /// Base URL of the OpenAI-compatible endpoint
    pub openai_api_base: String,
    /// Maximum web search results per task
    pub max_search_results: usize,
    /// Maximum writer revisions after the initial draft
    pub max_reflection_iterations: u32,
    /// Editor score (1-10) at which a draft auto-approves
    pub approval_threshold: u8,
    /// Maximum human plan rejections before giving up
    pub max_plan_attempts: u32,
    /// Log level when RUST_LOG is not set
    pub log_level: String,
    /// Log format: "console" or "json"
    pub log_format: String,
}

impl Settings {
    /// Load settings from the environment (and `.env` if present).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let settings = Self {
            openai_api_key: require("OPENAI_API_KEY")?,
            tavily_api_key: require("TAVILY_API_KEY")?,
            model_name: env::var("MODEL_NAME").unwrap_or_else(|_| "gpt-4o".to_string()),
            openai_api_base: env::var("OPENAI_API_BASE")
                .unwrap_or_else(|_| crate::llm::openai::DEFAULT_API_BASE.to_string()),
            max_search_results: parse_var("MAX_SEARCH_RESULTS", 10)?,
            max_reflection_iterations: parse_var("MAX_REFLECTION_ITERATIONS", 3)?,
            approval_threshold: parse_var("APPROVAL_THRESHOLD", 7)?,
            max_plan_attempts: parse_var("MAX_PLAN_ATTEMPTS", 3)?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "console".to_string()),
        };
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if !(1..=10).contains(&self.approval_threshold) {
            return Err(AppError::Config(format!(
                "APPROVAL_THRESHOLD must be between 1 and 10, got {}",
                self.approval_threshold
            )));
        }
        if self.max_plan_attempts == 0 {
            return Err(AppError::Config(
                "MAX_PLAN_ATTEMPTS must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Derive the orchestrator's immutable configuration.
    pub fn orchestrator_config(&self, parallel_tasks: bool) -> OrchestratorConfig {
        OrchestratorConfig {
            max_plan_attempts: self.max_plan_attempts,
            max_reflection_iterations: self.max_reflection_iterations,
            approval_threshold: self.approval_threshold,
            parallel_tasks,
        }
    }
}

fn require(key: &str) -> Result<String> {
    env::var(key).map_err(|_| AppError::Config(format!("{} is not set", key)))
}

fn parse_var<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| AppError::Config(format!("{} is invalid: {}", key, e))),
        Err(_) => Ok(default),
    }
}
