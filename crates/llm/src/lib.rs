//! LLM integration
//!
//! Features:
//! - Ollama and OpenAI-compatible backends behind the core `LanguageModel` trait
//! - Retries with exponential backoff on transient failures
//! - Prompt building with a per-turn language instruction

pub mod backend;
pub mod factory;
pub mod prompt;

pub use backend::{LlmConfig, OllamaBackend, OpenAiBackend, RetryPolicy};
pub use factory::create_language_model;
pub use prompt::PromptBuilder;

use thiserror::Error;

/// LLM errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Network(err.to_string())
        }
    }
}

impl From<LlmError> for polyglot_core::Error {
    fn from(err: LlmError) -> Self {
        polyglot_core::Error::Llm(err.to_string())
    }
}
