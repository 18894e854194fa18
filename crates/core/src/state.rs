//! Per-session language state
//!
//! `current_language` only ever changes through [`SessionLanguageState::commit_switch`],
//! after both the recognizer and the synthesizer have accepted the new
//! language. A switch in progress lives in `pending_switch` until then.

use std::sync::Arc;

use crate::registry::{LanguageProfile, LanguageRegistry};
use crate::{Error, Result};

/// The language currently active for STT and TTS in one session
#[derive(Debug, Clone)]
pub struct SessionLanguageState {
    current: Arc<LanguageProfile>,
    pending: Option<Arc<LanguageProfile>>,
}

impl SessionLanguageState {
    /// Start a session in `profile`
    pub fn new(profile: Arc<LanguageProfile>) -> Self {
        Self {
            current: profile,
            pending: None,
        }
    }

    /// Start a session in the registered language `language_id`
    pub fn from_registry(registry: &LanguageRegistry, language_id: &str) -> Result<Self> {
        registry
            .lookup(language_id)
            .map(Self::new)
            .ok_or_else(|| Error::LanguageNotFound(language_id.to_string()))
    }

    pub fn current_language(&self) -> &Arc<LanguageProfile> {
        &self.current
    }

    pub fn current_id(&self) -> &str {
        &self.current.id
    }

    pub fn pending_switch(&self) -> Option<&Arc<LanguageProfile>> {
        self.pending.as_ref()
    }

    pub fn is_switching(&self) -> bool {
        self.pending.is_some()
    }

    /// Record `target` as the switch being applied
    pub fn begin_switch(&mut self, target: Arc<LanguageProfile>) {
        self.pending = Some(target);
    }

    /// Make the pending switch current; returns the previous language
    pub fn commit_switch(&mut self) -> Option<Arc<LanguageProfile>> {
        let target = self.pending.take()?;
        Some(std::mem::replace(&mut self.current, target))
    }

    /// Drop the pending switch, keeping the current language
    pub fn abort_switch(&mut self) -> Option<Arc<LanguageProfile>> {
        self.pending.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_in(id: &str) -> SessionLanguageState {
        SessionLanguageState::from_registry(LanguageRegistry::builtin(), id).unwrap()
    }

    #[test]
    fn test_from_registry_rejects_unknown() {
        let result = SessionLanguageState::from_registry(LanguageRegistry::builtin(), "xx-XX");
        assert!(matches!(result, Err(Error::LanguageNotFound(_))));
    }

    #[test]
    fn test_commit_switch() {
        let mut state = state_in("en-US");
        let hindi = LanguageRegistry::builtin().lookup("hi-IN").unwrap();

        state.begin_switch(hindi);
        assert!(state.is_switching());
        assert_eq!(state.current_id(), "en-US");

        let previous = state.commit_switch().unwrap();
        assert_eq!(previous.id, "en-US");
        assert_eq!(state.current_id(), "hi-IN");
        assert!(state.pending_switch().is_none());
    }

    #[test]
    fn test_abort_switch_keeps_current() {
        let mut state = state_in("en-US");
        let tamil = LanguageRegistry::builtin().lookup("ta-IN").unwrap();

        state.begin_switch(tamil);
        let aborted = state.abort_switch().unwrap();
        assert_eq!(aborted.id, "ta-IN");
        assert_eq!(state.current_id(), "en-US");
        assert!(state.commit_switch().is_none());
        assert_eq!(state.current_id(), "en-US");
    }
}
