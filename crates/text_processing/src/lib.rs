//! Text processing for the polyglot voice agent
//!
//! This crate provides:
//! - **Language Detection**: map a transcript to a registered language with a confidence
//! - **Switch Commands**: recognise explicit "switch to X" requests in a transcript
//!
//! # Example
//!
//! ```ignore
//! use polyglot_text_processing::{DetectorConfig, LanguageDetector, ScriptClassifier};
//!
//! let detector = LanguageDetector::new(registry, Arc::new(ScriptClassifier::new()), DetectorConfig::default());
//! let detection = detector.detect("मुझे मौसम के बारे में बताओ").await;
//! assert_eq!(detection.language_id(), Some("hi-IN"));
//! ```

pub mod command;
pub mod detection;

pub use command::{CommandForm, SwitchCommand, SwitchCommandParser};
pub use detection::{
    Detection, DetectorConfig, FallbackClassifier, LanguageDetector, RecognizerHintClassifier,
    ScriptClassifier,
};
