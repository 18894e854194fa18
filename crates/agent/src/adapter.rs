//! Pipeline adapter
//!
//! Applies a [`SwitchDecision`] to the live recognizer and synthesizer.
//! A switch is staged in the session state, pushed to the recognizer, then
//! to the synthesizer, and only committed once both accepted it. If either
//! step fails the recognizer is pointed back at the previous language, the
//! staged switch is dropped and the error names the failing stage.

use std::sync::Arc;

use thiserror::Error;

use polyglot_core::{LanguageProfile, SessionLanguageState, SpeechRecognizer, SpeechSynthesizer};

use crate::policy::{RejectReason, SwitchDecision, SwitchTrigger};

/// Which collaborator refused the new language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconfigurationStage {
    Recognizer,
    Synthesizer,
}

impl std::fmt::Display for ReconfigurationStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReconfigurationStage::Recognizer => write!(f, "recognizer"),
            ReconfigurationStage::Synthesizer => write!(f, "synthesizer"),
        }
    }
}

/// A switch that could not be applied; the session kept its language
#[derive(Error, Debug, Clone, PartialEq)]
#[error("failed to switch {stage} to {target}: {message}")]
pub struct ReconfigurationError {
    pub stage: ReconfigurationStage,
    /// Language that was requested
    pub target: String,
    /// Language the session stays in
    pub current: String,
    pub message: String,
    /// False if the recognizer was switched and could not be switched back
    pub recognizer_restored: bool,
}

/// What applying a decision did
#[derive(Debug, Clone, PartialEq)]
pub enum AppliedOutcome {
    Unchanged,
    Rejected {
        reason: RejectReason,
        /// Localized notice, if one was spoken
        notice: Option<String>,
    },
    Switched {
        from: Arc<LanguageProfile>,
        to: Arc<LanguageProfile>,
        trigger: SwitchTrigger,
        confirmation: String,
        confirmation_spoken: bool,
    },
    /// Explicit request for the language already in use
    AlreadyActive {
        language: Arc<LanguageProfile>,
        confirmation: String,
        confirmation_spoken: bool,
    },
}

impl AppliedOutcome {
    /// Confirmation text produced by this outcome
    pub fn confirmation(&self) -> Option<&str> {
        match self {
            AppliedOutcome::Switched { confirmation, .. }
            | AppliedOutcome::AlreadyActive { confirmation, .. } => Some(confirmation),
            _ => None,
        }
    }

    pub fn is_switch(&self) -> bool {
        matches!(self, AppliedOutcome::Switched { .. })
    }
}

/// Owns the session's recognizer and synthesizer handles
pub struct PipelineAdapter {
    recognizer: Arc<dyn SpeechRecognizer>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    speak_rejection_notice: bool,
}

impl PipelineAdapter {
    pub fn new(
        recognizer: Arc<dyn SpeechRecognizer>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
    ) -> Self {
        Self {
            recognizer,
            synthesizer,
            speak_rejection_notice: true,
        }
    }

    /// Whether a rejected request is answered with the localized notice
    pub fn with_rejection_notice(mut self, enabled: bool) -> Self {
        self.speak_rejection_notice = enabled;
        self
    }

    pub fn synthesizer(&self) -> &Arc<dyn SpeechSynthesizer> {
        &self.synthesizer
    }

    /// Point both collaborators at the session's current language
    pub async fn sync(&self, state: &SessionLanguageState) -> polyglot_core::Result<()> {
        let current = state.current_language();
        self.recognizer.set_language(&current.id).await?;
        self.synthesizer
            .set_language(&current.id, &current.voice_id)
            .await
    }

    /// Apply `decision` to the collaborators and `state`
    pub async fn apply(
        &self,
        decision: SwitchDecision,
        state: &mut SessionLanguageState,
    ) -> Result<AppliedOutcome, ReconfigurationError> {
        match decision {
            SwitchDecision::NoChange => Ok(AppliedOutcome::Unchanged),
            SwitchDecision::Reject(reason) => Ok(self.reject(reason, state).await),
            SwitchDecision::SwitchTo { target, trigger } => {
                if target.id == state.current_id() {
                    let (confirmation, confirmation_spoken) = self.confirm(&target).await;
                    return Ok(AppliedOutcome::AlreadyActive {
                        language: target,
                        confirmation,
                        confirmation_spoken,
                    });
                }
                self.switch(target, trigger, state).await
            }
        }
    }

    async fn reject(&self, reason: RejectReason, state: &SessionLanguageState) -> AppliedOutcome {
        tracing::info!(current = %state.current_id(), reason = %reason, "Switch request rejected");
        if !self.speak_rejection_notice {
            return AppliedOutcome::Rejected {
                reason,
                notice: None,
            };
        }

        let notice = state.current_language().unrecognized_notice.clone();
        let notice = match self.synthesizer.speak(&notice).await {
            Ok(()) => Some(notice),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to speak rejection notice");
                None
            }
        };
        AppliedOutcome::Rejected { reason, notice }
    }

    async fn switch(
        &self,
        target: Arc<LanguageProfile>,
        trigger: SwitchTrigger,
        state: &mut SessionLanguageState,
    ) -> Result<AppliedOutcome, ReconfigurationError> {
        let previous = state.current_language().clone();
        state.begin_switch(target.clone());

        if let Err(e) = self.recognizer.set_language(&target.id).await {
            state.abort_switch();
            return Err(self.failure(ReconfigurationStage::Recognizer, &target, &previous, e, true));
        }

        if let Err(e) = self
            .synthesizer
            .set_language(&target.id, &target.voice_id)
            .await
        {
            let restored = match self.recognizer.set_language(&previous.id).await {
                Ok(()) => true,
                Err(restore_error) => {
                    tracing::error!(
                        language = %previous.id,
                        error = %restore_error,
                        "Failed to restore recognizer language"
                    );
                    false
                }
            };
            state.abort_switch();
            return Err(self.failure(
                ReconfigurationStage::Synthesizer,
                &target,
                &previous,
                e,
                restored,
            ));
        }

        state.commit_switch();
        tracing::info!(
            from = %previous.id,
            to = %target.id,
            trigger = trigger.label(),
            "Language switched"
        );

        let (confirmation, confirmation_spoken) = self.confirm(&target).await;
        Ok(AppliedOutcome::Switched {
            from: previous,
            to: target,
            trigger,
            confirmation,
            confirmation_spoken,
        })
    }

    /// Speak the localized confirmation; a failure does not undo the switch
    async fn confirm(&self, language: &LanguageProfile) -> (String, bool) {
        let confirmation = language.confirmation_text();
        match self.synthesizer.speak(&confirmation).await {
            Ok(()) => (confirmation, true),
            Err(e) => {
                tracing::warn!(language = %language.id, error = %e, "Failed to speak confirmation");
                (confirmation, false)
            }
        }
    }

    fn failure(
        &self,
        stage: ReconfigurationStage,
        target: &LanguageProfile,
        previous: &LanguageProfile,
        error: polyglot_core::Error,
        recognizer_restored: bool,
    ) -> ReconfigurationError {
        tracing::warn!(
            stage = %stage,
            target = %target.id,
            current = %previous.id,
            error = %error,
            "Language switch failed, keeping current language"
        );
        ReconfigurationError {
            stage,
            target: target.id.clone(),
            current: previous.id.clone(),
            message: error.to_string(),
            recognizer_restored,
        }
    }
}
