//! Application State
//!
//! Shared state across all handlers.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;

use polyglot_agent::{init_session, ConversationSession, PipelineAdapter, SessionConfig, SwitchPolicy};
use polyglot_config::Settings;
use polyglot_core::{LanguageModel, LanguageRegistry, SpeechRecognizer, SpeechSynthesizer};
use polyglot_llm::create_language_model;
use polyglot_text_processing::LanguageDetector;

use crate::ServerError;

/// What the server knows about a live session
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub language: String,
    pub identity: Option<String>,
    pub started_at: DateTime<Utc>,
}

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub registry: Arc<LanguageRegistry>,
    /// Stateless, shared by every session
    pub policy: Arc<SwitchPolicy>,
    pub llm: Arc<dyn LanguageModel>,
    sessions: Arc<DashMap<String, SessionSummary>>,
}

impl AppState {
    /// Build state with the configured LLM backend
    pub fn new(config: Settings) -> Result<Self, ServerError> {
        let llm = create_language_model(&config.agent.llm)?;
        Self::with_llm(config, llm)
    }

    /// Build state around an existing language model
    pub fn with_llm(config: Settings, llm: Arc<dyn LanguageModel>) -> Result<Self, ServerError> {
        let registry = Arc::new(config.languages.build_registry()?);
        let detector = LanguageDetector::from_config(registry.clone(), &config.detection);
        tracing::info!(
            languages = registry.len(),
            classifier = detector.classifier_name(),
            threshold = detector.config().confidence_threshold,
            "Language registry ready"
        );

        Ok(Self {
            policy: Arc::new(SwitchPolicy::new(registry.clone(), detector)),
            registry,
            llm,
            config: Arc::new(config),
            sessions: Arc::new(DashMap::new()),
        })
    }

    /// Create a conversation session and register it
    ///
    /// `language` overrides the configured default when given.
    pub fn open_session(
        &self,
        session_id: &str,
        language: Option<&str>,
        recognizer: Arc<dyn SpeechRecognizer>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
    ) -> Result<ConversationSession, ServerError> {
        let language = language.unwrap_or(&self.config.agent.default_language);
        let language_state = init_session(&self.registry, language)?;

        let adapter = PipelineAdapter::new(recognizer, synthesizer)
            .with_rejection_notice(self.config.agent.speak_rejection_notice);
        let session = ConversationSession::new(
            session_id,
            SessionConfig::from(&self.config.agent),
            language_state,
            self.policy.clone(),
            adapter,
            self.llm.clone(),
        );

        self.sessions.insert(
            session_id.to_string(),
            SessionSummary {
                session_id: session_id.to_string(),
                language: session.state().current_id().to_string(),
                identity: None,
                started_at: Utc::now(),
            },
        );
        tracing::info!(session_id = %session_id, language = %language, "Session opened");
        Ok(session)
    }

    /// Track a language change for the listing
    pub fn update_language(&self, session_id: &str, language: &str) {
        if let Some(mut summary) = self.sessions.get_mut(session_id) {
            summary.language = language.to_string();
        }
    }

    pub fn set_identity(&self, session_id: &str, identity: &str) {
        if let Some(mut summary) = self.sessions.get_mut(session_id) {
            summary.identity = Some(identity.to_string());
        }
    }

    pub fn close_session(&self, session_id: &str) -> Option<SessionSummary> {
        self.sessions.remove(session_id).map(|(_, summary)| summary)
    }

    /// Live sessions, oldest first
    pub fn sessions(&self) -> Vec<SessionSummary> {
        let mut sessions: Vec<SessionSummary> =
            self.sessions.iter().map(|entry| entry.value().clone()).collect();
        sessions.sort_by_key(|s| s.started_at);
        sessions
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}
