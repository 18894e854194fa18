//! Core traits for the voice agent system
//!
//! The controller talks to every external engine through these traits, so
//! backends can be swapped by configuration and replaced by mocks in tests.
//!
//! # Trait Hierarchy
//!
//! ```text
//! Speech Processing:
//!   - SpeechRecognizer: streaming STT session, reconfigurable language
//!   - SpeechSynthesizer: TTS session, reconfigurable language and voice
//!
//! Language Models:
//!   - LanguageModel: reply generation
//!
//! Language Identification:
//!   - LanguageClassifier: utterance → language code with confidence
//! ```

mod classifier;
mod llm;
mod speech;

pub use classifier::{Classification, LanguageClassifier};
pub use llm::LanguageModel;
pub use speech::{SpeechRecognizer, SpeechSynthesizer};
