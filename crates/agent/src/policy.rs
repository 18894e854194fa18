//! Switch policy
//!
//! Decides, for one utterance, whether the session should change language.
//! An explicit request always wins over detection and bypasses the
//! confidence threshold; detection only switches on a confident verdict for
//! a language other than the current one. The policy never mutates state.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use polyglot_core::{LanguageProfile, LanguageRegistry, SessionLanguageState, Utterance};
use polyglot_text_processing::{LanguageDetector, SwitchCommand, SwitchCommandParser};

/// What caused a switch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SwitchTrigger {
    /// The user asked for the language
    Explicit,
    /// The detector recognised the language
    Detected { confidence: f32 },
}

impl SwitchTrigger {
    pub fn label(&self) -> &'static str {
        match self {
            SwitchTrigger::Explicit => "explicit",
            SwitchTrigger::Detected { .. } => "detected",
        }
    }
}

/// Why a switch request was refused
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectReason {
    /// The requested language is not in the registry
    UnrecognizedLanguage { requested: String },
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::UnrecognizedLanguage { requested } => {
                write!(f, "unrecognized language '{}'", requested)
            }
        }
    }
}

/// Outcome of the policy for one utterance
#[derive(Debug, Clone, PartialEq)]
pub enum SwitchDecision {
    NoChange,
    SwitchTo {
        target: Arc<LanguageProfile>,
        trigger: SwitchTrigger,
    },
    Reject(RejectReason),
}

/// Explicit-first language switch policy
pub struct SwitchPolicy {
    registry: Arc<LanguageRegistry>,
    detector: LanguageDetector,
    parser: SwitchCommandParser,
}

impl SwitchPolicy {
    pub fn new(registry: Arc<LanguageRegistry>, detector: LanguageDetector) -> Self {
        Self {
            registry,
            detector,
            parser: SwitchCommandParser::new(),
        }
    }

    pub fn registry(&self) -> &Arc<LanguageRegistry> {
        &self.registry
    }

    pub fn detector(&self) -> &LanguageDetector {
        &self.detector
    }

    /// Confidence required for a detection-triggered switch
    pub fn threshold(&self) -> f32 {
        self.detector.config().confidence_threshold
    }

    /// Decide whether `utterance` should switch the session language
    ///
    /// `explicit` carries a request made outside the transcript (the client's
    /// language selector); otherwise the transcript itself is searched for a
    /// switch command before falling back to detection.
    pub async fn decide(
        &self,
        state: &SessionLanguageState,
        utterance: &Utterance,
        explicit: Option<&SwitchCommand>,
    ) -> SwitchDecision {
        if let Some(command) = explicit {
            return self.decide_explicit(command);
        }
        if let Some(command) = self.parser.parse(&utterance.text) {
            if command.is_direct() {
                return self.decide_explicit(&command);
            }
            if let Some(target) = self.resolve(&command.target_phrase) {
                return SwitchDecision::SwitchTo {
                    target,
                    trigger: SwitchTrigger::Explicit,
                };
            }
            tracing::trace!(
                phrase = %command.target_phrase,
                "Command-like phrase names no language, using detection"
            );
        }

        let detection = self.detector.detect_utterance(utterance).await;
        let Some(detected) = detection.language else {
            return SwitchDecision::NoChange;
        };

        if detected.id == state.current_id() {
            return SwitchDecision::NoChange;
        }
        if detection.confidence < self.threshold() {
            return SwitchDecision::NoChange;
        }

        tracing::debug!(
            from = %state.current_id(),
            to = %detected.id,
            confidence = detection.confidence,
            "Detected language change"
        );
        SwitchDecision::SwitchTo {
            target: detected,
            trigger: SwitchTrigger::Detected {
                confidence: detection.confidence,
            },
        }
    }

    /// Resolve an explicit request by locale tag, language code or name
    pub fn decide_explicit(&self, command: &SwitchCommand) -> SwitchDecision {
        let requested = command.target_phrase.trim();
        match self.resolve(requested) {
            Some(target) => SwitchDecision::SwitchTo {
                target,
                trigger: SwitchTrigger::Explicit,
            },
            None => {
                tracing::debug!(requested = %requested, "Switch request for unknown language");
                SwitchDecision::Reject(RejectReason::UnrecognizedLanguage {
                    requested: requested.to_string(),
                })
            }
        }
    }

    fn resolve(&self, requested: &str) -> Option<Arc<LanguageProfile>> {
        let requested = requested.trim();
        self.registry
            .lookup(requested)
            .or_else(|| self.registry.lookup_code(requested))
            .or_else(|| self.registry.resolve_from_natural_text(requested))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polyglot_config::{DetectionConfig, DetectionStrategy};

    fn policy() -> SwitchPolicy {
        let registry = Arc::new(LanguageRegistry::builtin().clone());
        let detector = LanguageDetector::from_config(
            registry.clone(),
            &DetectionConfig {
                strategy: DetectionStrategy::HintThenScript,
                ..Default::default()
            },
        );
        SwitchPolicy::new(registry, detector)
    }

    fn state_in(id: &str) -> SessionLanguageState {
        SessionLanguageState::from_registry(LanguageRegistry::builtin(), id).unwrap()
    }

    fn target_of(decision: &SwitchDecision) -> Option<&str> {
        match decision {
            SwitchDecision::SwitchTo { target, .. } => Some(target.id.as_str()),
            _ => None,
        }
    }

    #[tokio::test]
    async fn test_explicit_command_in_transcript() {
        let decision = policy()
            .decide(&state_in("en-US"), &Utterance::new("Switch to Tamil"), None)
            .await;
        assert_eq!(target_of(&decision), Some("ta-IN"));
        assert!(matches!(
            decision,
            SwitchDecision::SwitchTo { trigger: SwitchTrigger::Explicit, .. }
        ));
    }

    #[tokio::test]
    async fn test_explicit_wins_over_detected_language() {
        // Hindi script, but the user asks for Tamil
        let utterance = Utterance::new("तमिल में बात करो");
        let decision = policy().decide(&state_in("hi-IN"), &utterance, None).await;
        assert_eq!(target_of(&decision), Some("ta-IN"));
    }

    #[tokio::test]
    async fn test_selector_request_by_tag() {
        let command = SwitchCommand::new("te-IN");
        let decision = policy()
            .decide(&state_in("en-US"), &Utterance::new(""), Some(&command))
            .await;
        assert_eq!(target_of(&decision), Some("te-IN"));
    }

    #[tokio::test]
    async fn test_selector_request_by_code() {
        let command = SwitchCommand::new("hi");
        let decision = policy()
            .decide(&state_in("en-US"), &Utterance::new(""), Some(&command))
            .await;
        assert_eq!(target_of(&decision), Some("hi-IN"));
        assert!(matches!(
            decision,
            SwitchDecision::SwitchTo { trigger: SwitchTrigger::Explicit, .. }
        ));
    }

    #[tokio::test]
    async fn test_talk_about_topic_in_hindi_is_detected() {
        let decision = policy()
            .decide(&state_in("en-US"), &Utterance::new("मौसम के बारे में बात करो"), None)
            .await;
        assert_eq!(target_of(&decision), Some("hi-IN"));
        assert!(matches!(
            decision,
            SwitchDecision::SwitchTo { trigger: SwitchTrigger::Detected { .. }, .. }
        ));
    }

    #[tokio::test]
    async fn test_command_like_speech_is_no_change() {
        let policy = policy();
        let state = state_in("en-US");
        for text in [
            "Can you reply in detail please",
            "reply in detail",
            "I want to use my phone instead",
            "use my phone instead",
        ] {
            let decision = policy.decide(&state, &Utterance::new(text), None).await;
            assert_eq!(decision, SwitchDecision::NoChange, "{text:?}");
        }
    }

    #[tokio::test]
    async fn test_conversational_request_for_known_language() {
        let decision = policy()
            .decide(&state_in("en-US"), &Utterance::new("can you reply in Gujarati"), None)
            .await;
        assert_eq!(target_of(&decision), Some("gu-IN"));
        assert!(matches!(
            decision,
            SwitchDecision::SwitchTo { trigger: SwitchTrigger::Explicit, .. }
        ));
    }

    #[tokio::test]
    async fn test_unknown_language_rejected() {
        let decision = policy()
            .decide(&state_in("en-US"), &Utterance::new("switch to Klingon"), None)
            .await;
        assert_eq!(
            decision,
            SwitchDecision::Reject(RejectReason::UnrecognizedLanguage {
                requested: "Klingon".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_detected_switch() {
        let decision = policy()
            .decide(&state_in("en-US"), &Utterance::new("मुझे आज का मौसम बताओ"), None)
            .await;
        assert_eq!(target_of(&decision), Some("hi-IN"));
        assert!(matches!(
            decision,
            SwitchDecision::SwitchTo { trigger: SwitchTrigger::Detected { confidence }, .. }
                if confidence >= 0.5
        ));
    }

    #[tokio::test]
    async fn test_same_language_is_no_change() {
        let decision = policy()
            .decide(&state_in("hi-IN"), &Utterance::new("मुझे आज का मौसम बताओ"), None)
            .await;
        assert_eq!(decision, SwitchDecision::NoChange);
    }

    #[tokio::test]
    async fn test_short_or_unknown_is_no_change() {
        let policy = policy();
        let state = state_in("hi-IN");
        for text in ["ok", "12345", "?!"] {
            let decision = policy.decide(&state, &Utterance::new(text), None).await;
            assert_eq!(decision, SwitchDecision::NoChange, "{text:?}");
        }
    }

    #[tokio::test]
    async fn test_recognizer_hint_drives_detection() {
        let utterance = Utterance::new("vanakkam eppadi irukkinga").with_language_hint("ta-IN");
        let decision = policy().decide(&state_in("en-US"), &utterance, None).await;
        assert_eq!(target_of(&decision), Some("ta-IN"));
    }

    #[test]
    fn test_trigger_labels() {
        assert_eq!(SwitchTrigger::Explicit.label(), "explicit");
        assert_eq!(SwitchTrigger::Detected { confidence: 0.7 }.label(), "detected");
    }
}
