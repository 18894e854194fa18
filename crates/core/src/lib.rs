//! Core traits and types for the polyglot voice agent
//!
//! This crate provides foundational types used across all other crates:
//! - Collaborator traits for the external STT, TTS, LLM and classifier backends
//! - Script definitions and Unicode script statistics
//! - The language registry (supported languages, voices, greetings)
//! - Transcript and utterance types
//! - Per-session language state
//! - Error types

pub mod error;
pub mod language;
pub mod llm_types;
pub mod registry;
pub mod state;
pub mod traits;
pub mod transcript;

pub use error::{Error, Result};
pub use language::{Script, ScriptDistribution};
pub use llm_types::{GenerateRequest, GenerateResponse, Message, Role};
pub use registry::{LanguageProfile, LanguageRegistry};
pub use state::SessionLanguageState;
pub use transcript::{TranscriptEvent, Utterance};

pub use traits::{
    Classification, LanguageClassifier, LanguageModel, SpeechRecognizer, SpeechSynthesizer,
};
