//! Script definitions for the supported languages
//!
//! Every supported Indian language is written in its own Unicode block,
//! which makes the dominant script of a transcript a strong signal for
//! the spoken language.

use serde::{Deserialize, Serialize};

const SCRIPT_COUNT: usize = 11;

/// Script systems used by the supported languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Script {
    Latin,
    Devanagari,
    Bengali,
    Gurmukhi,
    Gujarati,
    Odia,
    Tamil,
    Telugu,
    Kannada,
    Malayalam,
    Arabic,
}

impl Script {
    /// All scripts, in the order used to break ties
    pub const ALL: [Script; SCRIPT_COUNT] = [
        Script::Latin,
        Script::Devanagari,
        Script::Bengali,
        Script::Gurmukhi,
        Script::Gujarati,
        Script::Odia,
        Script::Tamil,
        Script::Telugu,
        Script::Kannada,
        Script::Malayalam,
        Script::Arabic,
    ];

    /// Get Unicode range for this script (first block only)
    pub fn unicode_range(&self) -> (u32, u32) {
        match self {
            Self::Latin => (0x0041, 0x024F),
            Self::Devanagari => (0x0900, 0x097F),
            Self::Bengali => (0x0980, 0x09FF),
            Self::Gurmukhi => (0x0A00, 0x0A7F),
            Self::Gujarati => (0x0A80, 0x0AFF),
            Self::Odia => (0x0B00, 0x0B7F),
            Self::Tamil => (0x0B80, 0x0BFF),
            Self::Telugu => (0x0C00, 0x0C7F),
            Self::Kannada => (0x0C80, 0x0CFF),
            Self::Malayalam => (0x0D00, 0x0D7F),
            Self::Arabic => (0x0600, 0x06FF),
        }
    }

    /// Check if a character belongs to this script
    ///
    /// Latin only counts letters; digits and ASCII punctuation are shared
    /// by every language and carry no signal.
    pub fn contains_char(&self, c: char) -> bool {
        let code = c as u32;
        let (start, end) = self.unicode_range();
        if code < start || code > end {
            return false;
        }
        match self {
            Self::Latin => c.is_alphabetic(),
            _ => true,
        }
    }

    /// Script of a single character, if it is a letter of a known script
    pub fn of(c: char) -> Option<Self> {
        Self::ALL.iter().copied().find(|script| script.contains_char(c))
    }

    /// Detect script from text (returns most frequent script)
    pub fn detect(text: &str) -> Option<Self> {
        ScriptDistribution::of(text).dominant().map(|(script, _)| script)
    }

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Latin => "Latin",
            Self::Devanagari => "Devanagari",
            Self::Bengali => "Bengali",
            Self::Gurmukhi => "Gurmukhi",
            Self::Gujarati => "Gujarati",
            Self::Odia => "Odia",
            Self::Tamil => "Tamil",
            Self::Telugu => "Telugu",
            Self::Kannada => "Kannada",
            Self::Malayalam => "Malayalam",
            Self::Arabic => "Arabic",
        }
    }
}

impl std::fmt::Display for Script {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Per-script character counts over the letters of a text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptDistribution {
    counts: [usize; SCRIPT_COUNT],
    total: usize,
}

impl ScriptDistribution {
    /// Count the script of every letter in `text`
    pub fn of(text: &str) -> Self {
        let mut distribution = Self::default();
        for c in text.chars() {
            if let Some(index) = Script::ALL.iter().position(|s| s.contains_char(c)) {
                distribution.counts[index] += 1;
                distribution.total += 1;
            }
        }
        distribution
    }

    /// Number of characters attributed to any script
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of characters attributed to `script`
    pub fn count(&self, script: Script) -> usize {
        Script::ALL
            .iter()
            .position(|s| *s == script)
            .map(|index| self.counts[index])
            .unwrap_or(0)
    }

    /// Share of `script` among all counted characters, in `[0, 1]`
    pub fn share(&self, script: Script) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(script) as f32 / self.total as f32
    }

    /// Most frequent script and its share; ties go to the earlier script in [`Script::ALL`]
    pub fn dominant(&self) -> Option<(Script, f32)> {
        if self.total == 0 {
            return None;
        }
        let mut best: Option<(Script, usize)> = None;
        for (script, count) in Script::ALL.iter().zip(self.counts.iter()) {
            if *count > best.map(|(_, c)| c).unwrap_or(0) {
                best = Some((*script, *count));
            }
        }
        best.map(|(script, count)| (script, count as f32 / self.total as f32))
    }
}
