//! Conversation loop
//!
//! One [`ConversationSession`] per call. It exclusively owns the session's
//! language state and handles inputs strictly one at a time, so a turn's
//! decide → apply → respond sequence always completes before the next input
//! (including the end of the call) is observed.

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc};

use polyglot_config::AgentConfig;
use polyglot_core::{
    LanguageModel, LanguageProfile, LanguageRegistry, SessionLanguageState, TranscriptEvent,
    Utterance,
};
use polyglot_llm::PromptBuilder;
use polyglot_text_processing::SwitchCommand;

use crate::adapter::{AppliedOutcome, PipelineAdapter, ReconfigurationError};
use crate::memory::ChatHistory;
use crate::policy::{RejectReason, SwitchPolicy, SwitchTrigger};
use crate::AgentError;

/// Start a session's language state in `default_language_id`
pub fn init_session(
    registry: &LanguageRegistry,
    default_language_id: &str,
) -> Result<SessionLanguageState, AgentError> {
    SessionLanguageState::from_registry(registry, default_language_id).map_err(AgentError::from)
}

/// Per-session behaviour
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub system_prompt: String,
    pub greet_on_join: bool,
    pub max_history_turns: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig::from(&AgentConfig::default())
    }
}

impl From<&AgentConfig> for SessionConfig {
    fn from(config: &AgentConfig) -> Self {
        Self {
            system_prompt: config.system_prompt.clone(),
            greet_on_join: config.greet_on_join,
            max_history_turns: config.max_history_turns,
        }
    }
}

/// Input to the conversation loop
#[derive(Debug, Clone, PartialEq)]
pub enum SessionInput {
    /// The remote participant is connected and listening
    ParticipantJoined { identity: String },
    /// Recognizer output
    Transcript(TranscriptEvent),
    /// Language chosen in the client UI
    SelectLanguage(String),
    /// The call is over
    CallEnded,
}

/// Why the loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    CallEnded,
    InputClosed,
}

/// Read-only notifications for observers (transport, metrics, logs)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    Started {
        session_id: String,
        language: String,
    },
    Greeted {
        language: String,
        text: String,
    },
    InterimTranscript {
        text: String,
    },
    FinalTranscript {
        text: String,
    },
    LanguageSwitched {
        from: String,
        to: String,
        trigger: SwitchTrigger,
        confirmation: String,
    },
    SwitchRejected {
        requested: String,
        language: String,
    },
    SwitchFailed {
        target: String,
        language: String,
        stage: String,
        message: String,
    },
    Reply {
        text: String,
        language: String,
        latency_ms: u64,
    },
    Error {
        kind: String,
        message: String,
    },
    Ended {
        reason: EndReason,
    },
}

/// Result of one conversation turn
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    /// What the language adapter did; `None` if the switch failed
    pub applied: Option<AppliedOutcome>,
    /// Confirmation produced by a switch, if any
    pub confirmation: Option<String>,
    /// The assistant's reply
    pub reply: String,
    /// Language the reply was requested in
    pub language: String,
    /// A switch that could not be applied
    pub switch_error: Option<ReconfigurationError>,
}

/// One call's conversation loop
pub struct ConversationSession {
    id: String,
    config: SessionConfig,
    state: SessionLanguageState,
    policy: Arc<SwitchPolicy>,
    adapter: PipelineAdapter,
    llm: Arc<dyn LanguageModel>,
    history: ChatHistory,
    event_tx: broadcast::Sender<SessionEvent>,
}

impl ConversationSession {
    pub fn new(
        id: impl Into<String>,
        config: SessionConfig,
        state: SessionLanguageState,
        policy: Arc<SwitchPolicy>,
        adapter: PipelineAdapter,
        llm: Arc<dyn LanguageModel>,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(100);
        let history = ChatHistory::new(config.max_history_turns);
        Self {
            id: id.into(),
            config,
            state,
            policy,
            adapter,
            llm,
            history,
            event_tx,
        }
    }

    /// Subscribe to session events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_tx.subscribe()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> &SessionLanguageState {
        &self.state
    }

    pub fn current_language(&self) -> &Arc<LanguageProfile> {
        self.state.current_language()
    }

    pub fn history(&self) -> &ChatHistory {
        &self.history
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine
        let _ = self.event_tx.send(event);
    }

    fn emit_error(&self, error: &AgentError) {
        self.emit(SessionEvent::Error {
            kind: error.kind().to_string(),
            message: error.to_string(),
        });
    }

    /// Configure the collaborators for the initial language
    pub async fn start(&self) -> Result<(), AgentError> {
        self.adapter.sync(&self.state).await.map_err(|e| {
            let error = AgentError::from(e);
            self.emit_error(&error);
            error
        })?;
        self.emit(SessionEvent::Started {
            session_id: self.id.clone(),
            language: self.state.current_id().to_string(),
        });
        Ok(())
    }

    /// Speak the greeting in the current language
    pub async fn greet(&mut self) -> Result<String, AgentError> {
        let language = self.state.current_language().clone();
        let text = language.welcome_text();

        if let Err(e) = self.adapter.synthesizer().speak(&text).await {
            let error = AgentError::from(e);
            self.emit_error(&error);
            return Err(error);
        }

        tracing::info!(session_id = %self.id, language = %language.id, "Greeted participant");
        self.emit(SessionEvent::Greeted {
            language: language.id.clone(),
            text: text.clone(),
        });
        Ok(text)
    }

    /// Switch to the language picked in the client UI
    pub async fn select_language(
        &mut self,
        requested: &str,
    ) -> Result<AppliedOutcome, ReconfigurationError> {
        let command = SwitchCommand::new(requested);
        let decision = self
            .policy
            .decide(&self.state, &Utterance::new(requested), Some(&command))
            .await;
        let result = self.adapter.apply(decision, &mut self.state).await;
        self.report_switch(&result);
        result
    }

    /// Run one turn for a committed utterance
    pub async fn on_utterance(&mut self, utterance: Utterance) -> Result<TurnOutcome, AgentError> {
        let result = self.run_turn(utterance).await;
        if let Err(ref e) = result {
            if *e != AgentError::EmptyUtterance {
                tracing::warn!(session_id = %self.id, error = %e, "Turn failed");
                self.emit_error(e);
            }
        }
        result
    }

    async fn run_turn(&mut self, utterance: Utterance) -> Result<TurnOutcome, AgentError> {
        if utterance.is_blank() {
            return Err(AgentError::EmptyUtterance);
        }
        let start = Instant::now();

        let decision = self.policy.decide(&self.state, &utterance, None).await;
        let switch_result = self.adapter.apply(decision, &mut self.state).await;
        self.report_switch(&switch_result);

        let (applied, switch_error) = match switch_result {
            Ok(applied) => (Some(applied), None),
            Err(e) => (None, Some(e)),
        };
        let confirmation = applied
            .as_ref()
            .and_then(|a| a.confirmation())
            .map(str::to_string);

        let language = self.state.current_language().clone();
        let request = PromptBuilder::new(self.config.system_prompt.as_str())
            .with_language(&language)
            .with_history(self.history.messages())
            .user_message(&utterance.text)
            .build();

        let response = self.llm.generate(request).await?;
        let reply = response.text.trim().to_string();

        self.adapter.synthesizer().speak(&reply).await?;
        self.history.push_exchange(utterance.text.clone(), reply.clone());

        let latency_ms = start.elapsed().as_millis() as u64;
        tracing::debug!(
            session_id = %self.id,
            language = %language.id,
            latency_ms,
            "Turn complete"
        );
        self.emit(SessionEvent::Reply {
            text: reply.clone(),
            language: language.id.clone(),
            latency_ms,
        });

        Ok(TurnOutcome {
            applied,
            confirmation,
            reply,
            language: language.id.clone(),
            switch_error,
        })
    }

    fn report_switch(&self, result: &Result<AppliedOutcome, ReconfigurationError>) {
        match result {
            Ok(AppliedOutcome::Switched {
                from,
                to,
                trigger,
                confirmation,
                ..
            }) => self.emit(SessionEvent::LanguageSwitched {
                from: from.id.clone(),
                to: to.id.clone(),
                trigger: *trigger,
                confirmation: confirmation.clone(),
            }),
            Ok(AppliedOutcome::Rejected { reason, .. }) => {
                let RejectReason::UnrecognizedLanguage { requested } = reason;
                self.emit(SessionEvent::SwitchRejected {
                    requested: requested.clone(),
                    language: self.state.current_id().to_string(),
                });
            }
            Ok(_) => {}
            Err(e) => self.emit(SessionEvent::SwitchFailed {
                target: e.target.clone(),
                language: e.current.clone(),
                stage: e.stage.to_string(),
                message: e.message.clone(),
            }),
        }
    }

    /// Handle one input to completion
    pub async fn handle(&mut self, input: SessionInput) {
        match input {
            SessionInput::ParticipantJoined { identity } => {
                tracing::info!(session_id = %self.id, identity = %identity, "Participant joined");
                if self.config.greet_on_join {
                    // Failure already reported as an event
                    let _ = self.greet().await;
                }
            }
            SessionInput::Transcript(TranscriptEvent::Interim(text)) => {
                self.emit(SessionEvent::InterimTranscript { text });
            }
            SessionInput::Transcript(TranscriptEvent::Final(utterance)) => {
                self.emit(SessionEvent::FinalTranscript {
                    text: utterance.text.clone(),
                });
                if let Err(AgentError::EmptyUtterance) = self.on_utterance(utterance).await {
                    tracing::debug!(session_id = %self.id, "Ignoring empty utterance");
                }
            }
            SessionInput::SelectLanguage(language) => {
                let _ = self.select_language(&language).await;
            }
            SessionInput::CallEnded => {}
        }
    }

    /// Drive the session until the call ends or the input channel closes
    pub async fn run(mut self, mut inputs: mpsc::Receiver<SessionInput>) -> EndReason {
        if let Err(e) = self.start().await {
            tracing::warn!(session_id = %self.id, error = %e, "Initial language setup failed");
        }

        let reason = loop {
            match inputs.recv().await {
                Some(SessionInput::CallEnded) => break EndReason::CallEnded,
                Some(input) => self.handle(input).await,
                None => break EndReason::InputClosed,
            }
        };

        tracing::info!(
            session_id = %self.id,
            language = %self.state.current_id(),
            reason = ?reason,
            "Session ended"
        );
        self.emit(SessionEvent::Ended { reason });
        reason
    }
}
