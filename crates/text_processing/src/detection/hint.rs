//! Recognizer-reported language classifiers

use std::sync::Arc;

use async_trait::async_trait;

use polyglot_core::{Classification, LanguageClassifier, Result, Utterance};

/// Trusts the language the recognizer reported for the utterance
#[derive(Debug, Clone)]
pub struct RecognizerHintClassifier {
    confidence: f32,
}

impl RecognizerHintClassifier {
    /// `confidence` is reported for every hinted utterance
    pub fn new(confidence: f32) -> Self {
        Self {
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}

#[async_trait]
impl LanguageClassifier for RecognizerHintClassifier {
    async fn classify(&self, utterance: &Utterance) -> Result<Option<Classification>> {
        Ok(utterance
            .source_language_hint
            .as_deref()
            .map(str::trim)
            .filter(|hint| !hint.is_empty())
            .map(|hint| Classification::new(hint, self.confidence)))
    }

    fn name(&self) -> &str {
        "recognizer_hint"
    }
}

/// Asks `primary` first and falls back to `secondary` when it has no opinion or fails
pub struct FallbackClassifier {
    primary: Arc<dyn LanguageClassifier>,
    secondary: Arc<dyn LanguageClassifier>,
}

impl FallbackClassifier {
    pub fn new(primary: Arc<dyn LanguageClassifier>, secondary: Arc<dyn LanguageClassifier>) -> Self {
        Self { primary, secondary }
    }
}

#[async_trait]
impl LanguageClassifier for FallbackClassifier {
    async fn classify(&self, utterance: &Utterance) -> Result<Option<Classification>> {
        match self.primary.classify(utterance).await {
            Ok(Some(classification)) => return Ok(Some(classification)),
            Ok(None) => {}
            Err(e) => {
                tracing::debug!(
                    classifier = self.primary.name(),
                    error = %e,
                    "Primary classifier failed, falling back"
                );
            }
        }
        self.secondary.classify(utterance).await
    }

    fn name(&self) -> &str {
        "fallback"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScriptClassifier;

    fn hint_then_script() -> FallbackClassifier {
        FallbackClassifier::new(
            Arc::new(RecognizerHintClassifier::new(0.9)),
            Arc::new(ScriptClassifier::new()),
        )
    }

    #[tokio::test]
    async fn test_hint_reported_with_configured_confidence() {
        let classifier = RecognizerHintClassifier::new(0.8);
        let result = classifier
            .classify(&Utterance::new("vanakkam").with_language_hint("ta-IN"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(result, Classification::new("ta-IN", 0.8));
    }

    #[tokio::test]
    async fn test_missing_or_blank_hint_has_no_opinion() {
        let classifier = RecognizerHintClassifier::new(0.9);
        assert!(classifier.classify(&Utterance::new("hello")).await.unwrap().is_none());
        assert!(classifier
            .classify(&Utterance::new("hello").with_language_hint(" "))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_fallback_prefers_hint() {
        let utterance = Utterance::new("namaste kaise ho").with_language_hint("hi-IN");
        let result = hint_then_script().classify(&utterance).await.unwrap().unwrap();
        assert_eq!(result.language_code, "hi-IN");
    }

    #[tokio::test]
    async fn test_fallback_uses_script_without_hint() {
        let utterance = Utterance::new("নমস্কার কেমন আছেন");
        let result = hint_then_script().classify(&utterance).await.unwrap().unwrap();
        assert_eq!(result.language_code, "bn");
    }
}
