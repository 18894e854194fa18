//! Supported-language and detection configuration

use serde::{Deserialize, Serialize};

use polyglot_core::LanguageRegistry;

use crate::ConfigError;

/// Which languages a session may switch between
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LanguagesConfig {
    /// Enabled locale tags, in priority order; empty enables the full built-in table
    #[serde(default)]
    pub enabled: Vec<String>,
}

impl LanguagesConfig {
    /// Build the session registry from the built-in table
    pub fn build_registry(&self) -> Result<LanguageRegistry, ConfigError> {
        let builtin = LanguageRegistry::builtin();
        if self.enabled.is_empty() {
            return Ok(builtin.clone());
        }
        builtin.restricted_to(&self.enabled).map_err(|err| match err {
            polyglot_core::Error::LanguageNotFound(id) => ConfigError::UnknownLanguage(id),
            other => ConfigError::invalid("languages.enabled", other.to_string()),
        })
    }
}

/// Classifier used by the language detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DetectionStrategy {
    /// Dominant Unicode script of the transcript
    Script,
    /// Language reported by the recognizer
    RecognizerHint,
    /// Recognizer hint when present, script otherwise
    #[default]
    HintThenScript,
}

/// Language detector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    #[serde(default)]
    pub strategy: DetectionStrategy,

    /// Detections below this confidence are treated as unknown
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,

    /// Minimum non-whitespace characters before detection is attempted
    #[serde(default = "default_min_chars")]
    pub min_chars: usize,

    /// Confidence assigned to a recognizer-reported language
    #[serde(default = "default_hint_confidence")]
    pub hint_confidence: f32,
}

fn default_confidence_threshold() -> f32 {
    0.5
}
fn default_min_chars() -> usize {
    3
}
fn default_hint_confidence() -> f32 {
    0.9
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            strategy: DetectionStrategy::default(),
            confidence_threshold: default_confidence_threshold(),
            min_chars: default_min_chars(),
            hint_confidence: default_hint_confidence(),
        }
    }
}

impl DetectionConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(ConfigError::invalid(
                "detection.confidence_threshold",
                format!("Must be between 0.0 and 1.0, got {}", self.confidence_threshold),
            ));
        }
        if !(0.0..=1.0).contains(&self.hint_confidence) {
            return Err(ConfigError::invalid(
                "detection.hint_confidence",
                format!("Must be between 0.0 and 1.0, got {}", self.hint_confidence),
            ));
        }
        if self.min_chars == 0 {
            return Err(ConfigError::invalid("detection.min_chars", "Must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_enabled_uses_builtin() {
        let registry = LanguagesConfig::default().build_registry().unwrap();
        assert_eq!(registry.len(), LanguageRegistry::builtin().len());
    }

    #[test]
    fn test_enabled_subset_keeps_order() {
        let config = LanguagesConfig {
            enabled: vec!["ta-IN".to_string(), "en-US".to_string()],
        };
        let registry = config.build_registry().unwrap();
        let ids: Vec<&str> = registry.all().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["ta-IN", "en-US"]);
    }

    #[test]
    fn test_unknown_language_rejected() {
        let config = LanguagesConfig {
            enabled: vec!["en-US".to_string(), "fr-FR".to_string()],
        };
        assert!(matches!(
            config.build_registry(),
            Err(ConfigError::UnknownLanguage(id)) if id == "fr-FR"
        ));
    }

    #[test]
    fn test_detection_validation() {
        let mut config = DetectionConfig::default();
        assert!(config.validate().is_ok());

        config.confidence_threshold = 1.5;
        assert!(config.validate().is_err());

        config.confidence_threshold = 0.5;
        config.min_chars = 0;
        assert!(config.validate().is_err());
    }
}
