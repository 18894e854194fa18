//! Language registry
//!
//! The registry is the allow-list of languages a session may switch to.
//! It is built once at startup and shared read-only across sessions; every
//! lookup reports absence as `None` so callers can treat it as "no opinion".

use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::language::Script;
use crate::{Error, Result};

/// One supported spoken language
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageProfile {
    /// Locale tag, e.g. `hi-IN`
    pub id: String,
    /// English name
    pub display_name: String,
    /// Name in the language itself
    pub native_name: String,
    /// Synthesis voice identifier
    pub voice_id: String,
    /// Dominant script of the language
    pub script: Script,
    /// Lower-case names recognised inside natural text
    pub aliases: Vec<String>,
    /// Short localized greeting ("नमस्ते!")
    pub greeting: String,
    /// Localized opening question spoken after the greeting
    pub welcome: String,
    /// Localized sentence announcing that this language is now active
    pub switch_confirmation: String,
    /// Localized notice for an unrecognized language request
    pub unrecognized_notice: String,
}

impl LanguageProfile {
    /// Primary language subtag (`hi` for `hi-IN`)
    pub fn language_code(&self) -> &str {
        self.id.split(['-', '_']).next().unwrap_or(&self.id)
    }

    /// Text spoken when greeting a participant in this language
    pub fn welcome_text(&self) -> String {
        format!("{} {}", self.greeting, self.welcome)
    }

    /// Text spoken after switching to this language
    pub fn confirmation_text(&self) -> String {
        format!("{} {}", self.greeting, self.switch_confirmation)
    }

    /// Whether any alias occurs in an already lower-cased phrase
    fn mentioned_in(&self, lowered: &str) -> bool {
        self.aliases
            .iter()
            .any(|alias| !alias.is_empty() && lowered.contains(alias.as_str()))
    }
}

impl std::fmt::Display for LanguageProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.display_name, self.id)
    }
}

/// Ordered, immutable table of supported languages
#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    profiles: Vec<Arc<LanguageProfile>>,
}

static BUILTIN: Lazy<LanguageRegistry> = Lazy::new(|| LanguageRegistry {
    profiles: builtin_profiles().into_iter().map(Arc::new).collect(),
});

impl LanguageRegistry {
    /// Build a registry; registration order is the resolution priority
    pub fn new(profiles: Vec<LanguageProfile>) -> Result<Self> {
        if profiles.is_empty() {
            return Err(Error::InvalidRegistry("no languages registered".to_string()));
        }
        let mut seen: Vec<String> = Vec::with_capacity(profiles.len());
        for profile in &profiles {
            let key = profile.id.to_lowercase();
            if seen.contains(&key) {
                return Err(Error::InvalidRegistry(format!(
                    "duplicate language id: {}",
                    profile.id
                )));
            }
            seen.push(key);
        }

        Ok(Self {
            profiles: profiles
                .into_iter()
                .map(|mut profile| {
                    profile.aliases = profile.aliases.iter().map(|a| a.to_lowercase()).collect();
                    Arc::new(profile)
                })
                .collect(),
        })
    }

    /// The built-in table
    pub fn builtin() -> &'static LanguageRegistry {
        &BUILTIN
    }

    /// Subset of this registry containing `ids`, in the order given
    pub fn restricted_to(&self, ids: &[String]) -> Result<Self> {
        let profiles = ids
            .iter()
            .map(|id| {
                self.lookup(id)
                    .map(|profile| profile.as_ref().clone())
                    .ok_or_else(|| Error::LanguageNotFound(id.clone()))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(profiles)
    }

    /// Look up a profile by locale tag (case-insensitive)
    pub fn lookup(&self, id: &str) -> Option<Arc<LanguageProfile>> {
        let id = id.trim();
        self.profiles
            .iter()
            .find(|p| p.id.eq_ignore_ascii_case(id))
            .cloned()
    }

    /// Look up by full tag or primary language subtag (`hi` → `hi-IN`)
    pub fn lookup_code(&self, code: &str) -> Option<Arc<LanguageProfile>> {
        self.lookup(code).or_else(|| {
            let code = code.trim();
            let primary = code.split(['-', '_']).next().unwrap_or(code);
            self.profiles
                .iter()
                .find(|p| p.language_code().eq_ignore_ascii_case(primary))
                .cloned()
        })
    }

    /// First language (in registration order) whose name occurs in `phrase`
    pub fn resolve_from_natural_text(&self, phrase: &str) -> Option<Arc<LanguageProfile>> {
        let lowered = phrase.to_lowercase();
        self.profiles
            .iter()
            .find(|p| p.mentioned_in(&lowered))
            .cloned()
    }

    /// All profiles in registration order
    pub fn all(&self) -> &[Arc<LanguageProfile>] {
        &self.profiles
    }

    /// Whether `id` is registered
    pub fn contains(&self, id: &str) -> bool {
        self.lookup(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

#[allow(clippy::too_many_arguments)]
fn profile(
    id: &str,
    display_name: &str,
    native_name: &str,
    voice_id: &str,
    script: Script,
    aliases: &[&str],
    greeting: &str,
    welcome: &str,
    switch_confirmation: &str,
    unrecognized_notice: &str,
) -> LanguageProfile {
    LanguageProfile {
        id: id.to_string(),
        display_name: display_name.to_string(),
        native_name: native_name.to_string(),
        voice_id: voice_id.to_string(),
        script,
        aliases: aliases.iter().map(|a| a.to_lowercase()).collect(),
        greeting: greeting.to_string(),
        welcome: welcome.to_string(),
        switch_confirmation: switch_confirmation.to_string(),
        unrecognized_notice: unrecognized_notice.to_string(),
    }
}

fn builtin_profiles() -> Vec<LanguageProfile> {
    vec![
        profile(
            "en-US",
            "English",
            "English",
            "en-US-JennyNeural",
            Script::Latin,
            &["english", "angrezi", "अंग्रेज़ी", "अंग्रेजी"],
            "Hello!",
            "How can I help you today?",
            "Switching to English.",
            "Sorry, I didn't recognize that language.",
        ),
        profile(
            "hi-IN",
            "Hindi",
            "हिंदी",
            "hi-IN-SwaraNeural",
            Script::Devanagari,
            &["hindi", "हिंदी", "हिन्दी"],
            "नमस्ते!",
            "मैं आपकी क्या मदद कर सकती हूँ?",
            "अब हम हिंदी में बात करेंगे।",
            "माफ़ कीजिए, मैं उस भाषा को पहचान नहीं पाई।",
        ),
        profile(
            "ta-IN",
            "Tamil",
            "தமிழ்",
            "ta-IN-PallaviNeural",
            Script::Tamil,
            &["tamil", "தமிழ்", "तमिल"],
            "வணக்கம்!",
            "இன்று நான் உங்களுக்கு எப்படி உதவ முடியும்?",
            "இனி நாம் தமிழில் பேசலாம்.",
            "மன்னிக்கவும், அந்த மொழியை என்னால் அடையாளம் காண முடியவில்லை.",
        ),
        profile(
            "te-IN",
            "Telugu",
            "తెలుగు",
            "te-IN-ShrutiNeural",
            Script::Telugu,
            &["telugu", "తెలుగు", "तेलुगु"],
            "నమస్కారం!",
            "ఈ రోజు నేను మీకు ఎలా సహాయం చేయగలను?",
            "ఇప్పుడు మనం తెలుగులో మాట్లాడుదాం.",
            "క్షమించండి, ఆ భాషను నేను గుర్తించలేకపోయాను.",
        ),
        profile(
            "kn-IN",
            "Kannada",
            "ಕನ್ನಡ",
            "kn-IN-SapnaNeural",
            Script::Kannada,
            &["kannada", "ಕನ್ನಡ", "कन्नड़"],
            "ನಮಸ್ಕಾರ!",
            "ಇಂದು ನಾನು ನಿಮಗೆ ಹೇಗೆ ಸಹಾಯ ಮಾಡಬಹುದು?",
            "ಈಗ ನಾವು ಕನ್ನಡದಲ್ಲಿ ಮಾತನಾಡೋಣ.",
            "ಕ್ಷಮಿಸಿ, ಆ ಭಾಷೆಯನ್ನು ನಾನು ಗುರುತಿಸಲಿಲ್ಲ.",
        ),
        profile(
            "ml-IN",
            "Malayalam",
            "മലയാളം",
            "ml-IN-SobhanaNeural",
            Script::Malayalam,
            &["malayalam", "മലയാളം", "मलयालम"],
            "നമസ്കാരം!",
            "ഇന്ന് ഞാൻ നിങ്ങളെ എങ്ങനെ സഹായിക്കണം?",
            "ഇനി നമുക്ക് മലയാളത്തിൽ സംസാരിക്കാം.",
            "ക്ഷമിക്കണം, ആ ഭാഷ എനിക്ക് തിരിച്ചറിയാനായില്ല.",
        ),
        profile(
            "bn-IN",
            "Bengali",
            "বাংলা",
            "bn-IN-TanishaaNeural",
            Script::Bengali,
            &["bengali", "bangla", "বাংলা", "बंगाली"],
            "নমস্কার!",
            "আজ আমি আপনাকে কীভাবে সাহায্য করতে পারি?",
            "এখন থেকে আমরা বাংলায় কথা বলব।",
            "দুঃখিত, আমি ওই ভাষাটি চিনতে পারিনি।",
        ),
        profile(
            "gu-IN",
            "Gujarati",
            "ગુજરાતી",
            "gu-IN-DhwaniNeural",
            Script::Gujarati,
            &["gujarati", "ગુજરાતી", "गुजराती"],
            "નમસ્તે!",
            "આજે હું તમારી કેવી રીતે મદદ કરી શકું?",
            "હવે આપણે ગુજરાતીમાં વાત કરીશું.",
            "માફ કરશો, હું તે ભાષા ઓળખી શકી નહીં.",
        ),
    ]
}
