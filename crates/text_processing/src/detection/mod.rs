//! Language detection
//!
//! The detector wraps a pluggable [`LanguageClassifier`] and turns its raw
//! output into a registry-aware verdict. Anything the classifier cannot
//! back with enough confidence, or that falls outside the registry, comes
//! out as unknown with confidence 0. The detector never fails: classifier
//! errors are logged and treated as unknown.

mod hint;
mod script;

pub use hint::{FallbackClassifier, RecognizerHintClassifier};
pub use script::ScriptClassifier;

use std::sync::Arc;

use unicode_segmentation::UnicodeSegmentation;

use polyglot_config::{DetectionConfig, DetectionStrategy};
use polyglot_core::{LanguageClassifier, LanguageProfile, LanguageRegistry, Utterance};

/// Detector thresholds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorConfig {
    /// Detections below this confidence are unknown
    pub confidence_threshold: f32,
    /// Inputs with fewer non-whitespace grapheme clusters are unknown
    pub min_chars: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.5,
            min_chars: 3,
        }
    }
}

impl From<&DetectionConfig> for DetectorConfig {
    fn from(config: &DetectionConfig) -> Self {
        Self {
            confidence_threshold: config.confidence_threshold,
            min_chars: config.min_chars,
        }
    }
}

/// Detector verdict for one utterance
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Detected registered language, `None` when unknown
    pub language: Option<Arc<LanguageProfile>>,
    /// Confidence in `[0, 1]`; always 0 when unknown
    pub confidence: f32,
}

impl Detection {
    pub fn unknown() -> Self {
        Self {
            language: None,
            confidence: 0.0,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.language.is_none()
    }

    pub fn language_id(&self) -> Option<&str> {
        self.language.as_ref().map(|p| p.id.as_str())
    }
}

/// Registry-aware language detector
pub struct LanguageDetector {
    registry: Arc<LanguageRegistry>,
    classifier: Arc<dyn LanguageClassifier>,
    config: DetectorConfig,
}

impl LanguageDetector {
    pub fn new(
        registry: Arc<LanguageRegistry>,
        classifier: Arc<dyn LanguageClassifier>,
        config: DetectorConfig,
    ) -> Self {
        Self {
            registry,
            classifier,
            config,
        }
    }

    /// Build a detector with the classifier selected by `detection.strategy`
    pub fn from_config(registry: Arc<LanguageRegistry>, config: &DetectionConfig) -> Self {
        let classifier: Arc<dyn LanguageClassifier> = match config.strategy {
            DetectionStrategy::Script => Arc::new(ScriptClassifier::new()),
            DetectionStrategy::RecognizerHint => {
                Arc::new(RecognizerHintClassifier::new(config.hint_confidence))
            }
            DetectionStrategy::HintThenScript => Arc::new(FallbackClassifier::new(
                Arc::new(RecognizerHintClassifier::new(config.hint_confidence)),
                Arc::new(ScriptClassifier::new()),
            )),
        };
        Self::new(registry, classifier, DetectorConfig::from(config))
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn classifier_name(&self) -> &str {
        self.classifier.name()
    }

    /// Detect the language of bare text
    pub async fn detect(&self, text: &str) -> Detection {
        self.detect_utterance(&Utterance::new(text)).await
    }

    /// Detect the language of an utterance, passing the recognizer hint to the classifier
    pub async fn detect_utterance(&self, utterance: &Utterance) -> Detection {
        if visible_length(&utterance.text) < self.config.min_chars {
            return Detection::unknown();
        }

        let classification = match self.classifier.classify(utterance).await {
            Ok(Some(classification)) => classification,
            Ok(None) => return Detection::unknown(),
            Err(e) => {
                tracing::warn!(
                    classifier = self.classifier.name(),
                    error = %e,
                    "Language classifier failed, treating as unknown"
                );
                return Detection::unknown();
            }
        };

        if classification.confidence < self.config.confidence_threshold {
            tracing::trace!(
                code = %classification.language_code,
                confidence = classification.confidence,
                "Detection below threshold"
            );
            return Detection::unknown();
        }

        match self.registry.lookup_code(&classification.language_code) {
            Some(profile) => Detection {
                language: Some(profile),
                confidence: classification.confidence,
            },
            None => {
                tracing::debug!(
                    code = %classification.language_code,
                    "Detected language is not enabled"
                );
                Detection::unknown()
            }
        }
    }
}

/// Number of non-whitespace grapheme clusters
fn visible_length(text: &str) -> usize {
    text.graphemes(true)
        .filter(|g| !g.chars().all(char::is_whitespace))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use polyglot_core::{Classification, Error, Result};

    struct FixedClassifier(Result<Option<Classification>>);

    #[async_trait]
    impl LanguageClassifier for FixedClassifier {
        async fn classify(&self, _utterance: &Utterance) -> Result<Option<Classification>> {
            self.0.clone()
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn detector_with(result: Result<Option<Classification>>) -> LanguageDetector {
        LanguageDetector::new(
            Arc::new(LanguageRegistry::builtin().clone()),
            Arc::new(FixedClassifier(result)),
            DetectorConfig::default(),
        )
    }

    fn script_detector() -> LanguageDetector {
        LanguageDetector::from_config(
            Arc::new(LanguageRegistry::builtin().clone()),
            &DetectionConfig {
                strategy: DetectionStrategy::Script,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_visible_length_counts_graphemes() {
        assert_eq!(visible_length("  a b "), 2);
        // "कीमत" is 4 code points but 3 grapheme clusters
        assert_eq!(visible_length("कीमत"), 3);
        assert_eq!(visible_length("\t\n"), 0);
    }

    #[tokio::test]
    async fn test_short_input_is_unknown() {
        let detector = detector_with(Ok(Some(Classification::new("hi", 1.0))));
        for text in ["", "  ", "ok", "हा"] {
            let detection = detector.detect(text).await;
            assert!(detection.is_unknown(), "{text:?} should be unknown");
            assert_eq!(detection.confidence, 0.0);
        }
    }

    #[tokio::test]
    async fn test_below_threshold_is_unknown() {
        let detector = detector_with(Ok(Some(Classification::new("hi", 0.49))));
        let detection = detector.detect("kuch bhi bolo").await;
        assert_eq!(detection, Detection::unknown());
    }

    #[tokio::test]
    async fn test_threshold_is_inclusive() {
        let detector = detector_with(Ok(Some(Classification::new("ta", 0.5))));
        let detection = detector.detect("வணக்கம்").await;
        assert_eq!(detection.language_id(), Some("ta-IN"));
        assert_eq!(detection.confidence, 0.5);
    }

    #[tokio::test]
    async fn test_unregistered_code_is_unknown() {
        let detector = detector_with(Ok(Some(Classification::new("fr", 0.99))));
        assert!(detector.detect("bonjour tout le monde").await.is_unknown());
    }

    #[tokio::test]
    async fn test_classifier_error_is_unknown() {
        let detector = detector_with(Err(Error::Classifier("model not loaded".into())));
        let detection = detector.detect("hello there").await;
        assert!(detection.is_unknown());
        assert_eq!(detection.confidence, 0.0);
    }

    #[tokio::test]
    async fn test_script_detection_end_to_end() {
        let detector = script_detector();

        let hindi = detector.detect("मुझे आज का मौसम बताओ").await;
        assert_eq!(hindi.language_id(), Some("hi-IN"));
        assert!(hindi.confidence >= 0.99);

        let english = detector.detect("what is the weather today").await;
        assert_eq!(english.language_id(), Some("en-US"));

        let telugu = detector.detect("ఈ రోజు వాతావరణం ఎలా ఉంది").await;
        assert_eq!(telugu.language_id(), Some("te-IN"));
    }

    #[tokio::test]
    async fn test_restricted_registry_drops_disabled_language() {
        let registry = LanguageRegistry::builtin()
            .restricted_to(&["en-US".to_string(), "hi-IN".to_string()])
            .unwrap();
        let detector = LanguageDetector::new(
            Arc::new(registry),
            Arc::new(ScriptClassifier::new()),
            DetectorConfig::default(),
        );

        assert!(detector.detect("வணக்கம் நண்பரே").await.is_unknown());
    }
}
