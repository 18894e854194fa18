//! Explicit language-switch commands
//!
//! Recognises requests such as "switch to Tamil", "can you speak in Hindi",
//! "change the language to English" or "हिंदी में बात करो" and extracts the
//! phrase naming the requested language. Resolving that phrase against the
//! registry is left to the caller.
//!
//! Only the "switch/change (the language) to X" phrasing is a [`CommandForm::Direct`]
//! request. The other phrasings also occur in ordinary speech ("reply in
//! detail", "use my phone instead") and are parsed as
//! [`CommandForm::Conversational`]: they count as a request only when the
//! phrase names a known language.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Up to three words following the command verb
const TARGET: &str = r"(?P<target>[\p{L}\p{M}]+(?:\s+[\p{L}\p{M}]+){0,2})";

static SWITCH_PATTERNS: Lazy<Vec<(Regex, CommandForm)>> = Lazy::new(|| {
    [
        (
            format!(r"(?i)\b(?:switch|change)\s+(?:the\s+)?(?:language\s+)?(?:over\s+)?to\s+{TARGET}"),
            CommandForm::Direct,
        ),
        (
            format!(r"(?i)\b(?:speak|talk|respond|reply|answer)\s+(?:to\s+me\s+)?in\s+{TARGET}"),
            CommandForm::Conversational,
        ),
        (
            format!(r"(?i)\buse\s+{TARGET}\s+(?:language\s+)?(?:from\s+now|instead)"),
            CommandForm::Conversational,
        ),
        // "X के बारे में बात करो" is "talk about X"
        (
            r"(?:(?P<postposition>के|की|का)\s+)?(?P<target>[\p{L}\p{M}]+)\s+में\s+(?:बात|बोल|जवाब)"
                .to_string(),
            CommandForm::Conversational,
        ),
    ]
    .into_iter()
    .filter_map(|(pattern, form)| match Regex::new(&pattern) {
        Ok(regex) => Some((regex, form)),
        Err(e) => {
            tracing::error!(pattern = %pattern, error = %e, "Invalid switch command pattern");
            None
        }
    })
    .collect()
});

/// How unambiguous a switch command is
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandForm {
    /// Names the language change outright; an unknown language is an error
    #[default]
    Direct,
    /// Looks like a request but may be ordinary speech
    Conversational,
}

/// An explicit request to change the conversation language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchCommand {
    /// Phrase naming the requested language, as spoken ("tamil", "हिंदी")
    pub target_phrase: String,
    #[serde(default)]
    pub form: CommandForm,
}

impl SwitchCommand {
    /// A direct request, as made through a language selector
    pub fn new(target_phrase: impl Into<String>) -> Self {
        Self {
            target_phrase: target_phrase.into(),
            form: CommandForm::Direct,
        }
    }

    pub fn conversational(target_phrase: impl Into<String>) -> Self {
        Self {
            target_phrase: target_phrase.into(),
            form: CommandForm::Conversational,
        }
    }

    pub fn is_direct(&self) -> bool {
        self.form == CommandForm::Direct
    }
}

/// Extracts [`SwitchCommand`]s from transcripts
#[derive(Debug, Clone, Default)]
pub struct SwitchCommandParser;

impl SwitchCommandParser {
    pub fn new() -> Self {
        Self
    }

    /// The first switch command in `text`, if any
    pub fn parse(&self, text: &str) -> Option<SwitchCommand> {
        SWITCH_PATTERNS.iter().find_map(|(regex, form)| {
            let caps = regex.captures(text)?;
            if caps.name("postposition").is_some() {
                return None;
            }
            let target = caps.name("target")?.as_str().trim();
            Some(SwitchCommand {
                target_phrase: target.to_string(),
                form: *form,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(text: &str) -> Option<String> {
        SwitchCommandParser::new().parse(text).map(|c| c.target_phrase)
    }

    #[test]
    fn test_english_phrasings() {
        assert_eq!(target("Switch to Tamil").as_deref(), Some("Tamil"));
        assert_eq!(
            target("could you change the language to hindi please").as_deref(),
            Some("hindi please")
        );
        assert_eq!(target("Please speak in Telugu.").as_deref(), Some("Telugu"));
        assert_eq!(target("can you talk to me in english").as_deref(), Some("english"));
        assert_eq!(target("use Kannada from now on").as_deref(), Some("Kannada"));
    }

    #[test]
    fn test_hindi_phrasing() {
        assert_eq!(target("अब हिंदी में बात करो").as_deref(), Some("हिंदी"));
        assert_eq!(target("तमिल में बोलो").as_deref(), Some("तमिल"));
    }

    #[test]
    fn test_unregistered_language_still_parsed() {
        assert_eq!(target("switch to Klingon").as_deref(), Some("Klingon"));
    }

    #[test]
    fn test_no_command() {
        assert_eq!(target("what is the weather in Chennai"), None);
        assert_eq!(target("मुझे मौसम बताओ"), None);
        assert_eq!(target("switch"), None);
    }

    #[test]
    fn test_talk_about_is_not_a_command() {
        assert_eq!(target("मौसम के बारे में बात करो"), None);
        assert_eq!(target("क्रिकेट की दुनिया में बात करो"), None);
    }

    #[test]
    fn test_command_forms() {
        let parser = SwitchCommandParser::new();
        let direct = parser.parse("please change the language to Tamil").unwrap();
        assert!(direct.is_direct());

        for text in [
            "Can you reply in detail please",
            "I want to use my phone instead",
            "हिंदी में बात करो",
        ] {
            let command = parser.parse(text).unwrap();
            assert_eq!(command.form, CommandForm::Conversational, "{text:?}");
        }
        assert_eq!(
            parser.parse("I want to use my phone instead").unwrap().target_phrase,
            "my phone"
        );
    }

    #[test]
    fn test_selector_command_is_direct() {
        let command: SwitchCommand = serde_json::from_str(r#"{"target_phrase":"hi"}"#).unwrap();
        assert_eq!(command, SwitchCommand::new("hi"));
    }
}
