//! Transcript types produced by the streaming recognizer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One finalized unit of recognized user speech
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    /// Recognized transcript
    pub text: String,
    /// Language reported by the recognizer, if it produces multi-language hypotheses
    #[serde(default)]
    pub source_language_hint: Option<String>,
    /// When the final transcript arrived
    #[serde(default = "Utc::now")]
    pub received_at: DateTime<Utc>,
}

impl Utterance {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source_language_hint: None,
            received_at: Utc::now(),
        }
    }

    /// Attach the recognizer-reported language
    pub fn with_language_hint(mut self, hint: impl Into<String>) -> Self {
        self.source_language_hint = Some(hint.into());
        self
    }

    /// A committed utterance must carry some non-whitespace text
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Event emitted by the streaming recognizer
#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptEvent {
    /// Unstable partial hypothesis, for display only
    Interim(String),
    /// Committed utterance
    Final(Utterance),
}

impl TranscriptEvent {
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Final(_))
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Interim(text) => text,
            Self::Final(utterance) => &utterance.text,
        }
    }
}
