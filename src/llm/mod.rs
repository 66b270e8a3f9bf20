//! LLM client abstraction
//!
//! A narrow provider-agnostic trait plus an OpenAI-compatible implementation.
//! Every agent in the pipeline talks to its model through [`LLMClient`], so
//! swapping providers never touches agent code.

/// OpenAI-compatible chat-completions client.
pub mod openai;

use crate::types::Result;
use async_trait::async_trait;

pub use openai::OpenAIClient;

/// Generic LLM client trait for provider abstraction.
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Generate a completion from a prompt
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Generate with a system prompt
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String>;

    /// Get the model name/identifier
    fn model_name(&self) -> &str;
}
