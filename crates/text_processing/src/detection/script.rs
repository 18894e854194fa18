//! Script-statistics classifier
//!
//! Every supported Indian language is written in its own Unicode block, so
//! the share of letters in the dominant script is a usable confidence.
//! Romanized Indian speech is indistinguishable from English here and comes
//! out as `en`.

use async_trait::async_trait;

use polyglot_core::{Classification, LanguageClassifier, Result, Script, ScriptDistribution, Utterance};

/// Classifies by the dominant Unicode script of the transcript
#[derive(Debug, Clone, Default)]
pub struct ScriptClassifier;

impl ScriptClassifier {
    pub fn new() -> Self {
        Self
    }

    /// ISO 639-1 code most commonly written in `script`
    pub fn code_for(script: Script) -> &'static str {
        match script {
            Script::Latin => "en",
            Script::Devanagari => "hi",
            Script::Bengali => "bn",
            Script::Gurmukhi => "pa",
            Script::Gujarati => "gu",
            Script::Odia => "or",
            Script::Tamil => "ta",
            Script::Telugu => "te",
            Script::Kannada => "kn",
            Script::Malayalam => "ml",
            Script::Arabic => "ur",
        }
    }

    /// Synchronous classification of bare text
    pub fn classify_text(&self, text: &str) -> Option<Classification> {
        ScriptDistribution::of(text)
            .dominant()
            .map(|(script, share)| Classification::new(Self::code_for(script), share))
    }
}

#[async_trait]
impl LanguageClassifier for ScriptClassifier {
    async fn classify(&self, utterance: &Utterance) -> Result<Option<Classification>> {
        Ok(self.classify_text(&utterance.text))
    }

    fn name(&self) -> &str {
        "script"
    }
}
