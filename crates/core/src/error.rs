//! Error types shared across the workspace

use thiserror::Error;

/// Core error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Language not found: {0}")]
    LanguageNotFound(String),

    #[error("Invalid language registry: {0}")]
    InvalidRegistry(String),

    #[error("Recognizer error: {0}")]
    Recognizer(String),

    #[error("Synthesizer error: {0}")]
    Synthesizer(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Classifier error: {0}")]
    Classifier(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Session closed")]
    SessionClosed,
}

/// Result alias using the core [`Error`]
pub type Result<T> = std::result::Result<T, Error>;
