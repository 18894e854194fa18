//! Dynamic language adaptation for a voice conversation
//!
//! Features:
//! - Switch policy: explicit requests and confident detections become switch decisions
//! - Pipeline adapter: applies a decision to the live recognizer and synthesizer
//! - Conversation loop: one sequential task per call, with bounded chat history

pub mod adapter;
pub mod memory;
pub mod policy;
pub mod session;

pub use adapter::{AppliedOutcome, PipelineAdapter, ReconfigurationError, ReconfigurationStage};
pub use memory::ChatHistory;
pub use policy::{RejectReason, SwitchDecision, SwitchPolicy, SwitchTrigger};
pub use session::{
    init_session, ConversationSession, EndReason, SessionConfig, SessionEvent, SessionInput,
    TurnOutcome,
};

use thiserror::Error;

/// Agent errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AgentError {
    #[error("Utterance is empty")]
    EmptyUtterance,

    #[error("Language error: {0}")]
    Language(String),

    #[error("Speech error: {0}")]
    Speech(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Agent error: {0}")]
    Internal(String),
}

impl AgentError {
    /// Short label used in events and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            AgentError::EmptyUtterance => "empty_utterance",
            AgentError::Language(_) => "language",
            AgentError::Speech(_) => "speech",
            AgentError::Llm(_) => "llm",
            AgentError::Internal(_) => "internal",
        }
    }
}

impl From<polyglot_core::Error> for AgentError {
    fn from(err: polyglot_core::Error) -> Self {
        use polyglot_core::Error;
        match err {
            Error::LanguageNotFound(_) | Error::InvalidRegistry(_) => {
                AgentError::Language(err.to_string())
            }
            Error::Recognizer(_) | Error::Synthesizer(_) => AgentError::Speech(err.to_string()),
            Error::Llm(_) => AgentError::Llm(err.to_string()),
            other => AgentError::Internal(other.to_string()),
        }
    }
}

impl From<polyglot_llm::LlmError> for AgentError {
    fn from(err: polyglot_llm::LlmError) -> Self {
        AgentError::Llm(err.to_string())
    }
}
