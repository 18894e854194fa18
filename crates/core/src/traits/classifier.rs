//! Language identification trait

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{Result, Utterance};

/// Raw output of a language classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Language code as produced by the classifier (`"hi"`, `"ta-IN"`, ...)
    pub language_code: String,
    /// Confidence in `[0, 1]`
    pub confidence: f32,
}

impl Classification {
    pub fn new(language_code: impl Into<String>, confidence: f32) -> Self {
        Self {
            language_code: language_code.into(),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}

/// Text (or recognizer-metadata) based language classifier
///
/// Returns `Ok(None)` when the classifier has no opinion about the utterance.
#[async_trait]
pub trait LanguageClassifier: Send + Sync + 'static {
    async fn classify(&self, utterance: &Utterance) -> Result<Option<Classification>>;

    /// Get classifier name for logging
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_clamps_confidence() {
        assert_eq!(Classification::new("hi", 1.7).confidence, 1.0);
        assert_eq!(Classification::new("hi", -0.2).confidence, 0.0);
    }
}
