//! WebSocket Handler
//!
//! One connection drives one conversation session. The client owns the media
//! pipeline: it streams transcripts in, and receives reconfiguration and
//! speech instructions from the WebSocket-backed recognizer and synthesizer.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::StatusCode,
    response::Response,
};
use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc};

use polyglot_agent::{EndReason, SessionEvent, SessionInput};
use polyglot_core::{
    Error, Result, SpeechRecognizer, SpeechSynthesizer, TranscriptEvent, Utterance,
};

use crate::metrics::{record_session_created, record_session_event};
use crate::state::AppState;

/// Client → server messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Participant connected and listening
    Join { identity: String },
    /// Recognizer output
    Transcript {
        text: String,
        #[serde(default)]
        is_final: bool,
        /// Language the recognizer reported, if any
        #[serde(default)]
        language: Option<String>,
    },
    /// Language picked in the client UI
    SelectLanguage { language: String },
    /// Hang up
    End,
}

impl ClientMessage {
    /// Translate into conversation-loop input
    pub fn into_input(self) -> SessionInput {
        match self {
            ClientMessage::Join { identity } => SessionInput::ParticipantJoined { identity },
            ClientMessage::Transcript {
                text,
                is_final: false,
                ..
            } => SessionInput::Transcript(TranscriptEvent::Interim(text)),
            ClientMessage::Transcript { text, language, .. } => {
                let mut utterance = Utterance::new(text);
                if let Some(language) = language {
                    utterance = utterance.with_language_hint(language);
                }
                SessionInput::Transcript(TranscriptEvent::Final(utterance))
            },
            ClientMessage::SelectLanguage { language } => SessionInput::SelectLanguage(language),
            ClientMessage::End => SessionInput::CallEnded,
        }
    }
}

/// Server → client messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    SessionInfo {
        session_id: String,
        language: String,
        languages: Vec<String>,
    },
    /// Reconfigure speech recognition
    RecognizerLanguage { language: String },
    /// Reconfigure speech synthesis
    Voice { language: String, voice: String },
    /// Say this with the current voice
    Speak { text: String, language: String },
    Transcript { text: String, is_final: bool },
    LanguageSwitched {
        from: String,
        to: String,
        trigger: String,
        confirmation: String,
    },
    SwitchRejected { requested: String, language: String },
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
    Error { kind: String, message: String },
    Ended { reason: EndReason },
}

impl ServerMessage {
    /// Client-facing form of a session event
    pub fn from_event(event: SessionEvent) -> Option<Self> {
        match event {
            SessionEvent::InterimTranscript { text } => Some(ServerMessage::Transcript {
                text,
                is_final: false,
            }),
            SessionEvent::FinalTranscript { text } => Some(ServerMessage::Transcript {
                text,
                is_final: true,
            }),
            SessionEvent::LanguageSwitched {
                from,
                to,
                trigger,
                confirmation,
            } => Some(ServerMessage::LanguageSwitched {
                from,
                to,
                trigger: trigger.label().to_string(),
                confirmation,
            }),
            SessionEvent::SwitchRejected {
                requested,
                language,
            } => Some(ServerMessage::SwitchRejected {
                requested,
                language,
            }),
            SessionEvent::SwitchFailed {
                target,
                language,
                stage,
                message,
            } => Some(ServerMessage::SwitchFailed {
                target,
                language,
                stage,
                message,
            }),
            SessionEvent::Reply {
                text,
                language,
                latency_ms,
            } => Some(ServerMessage::Reply {
                text,
                language,
                latency_ms,
            }),
            SessionEvent::Error { kind, message } => Some(ServerMessage::Error { kind, message }),
            SessionEvent::Ended { reason } => Some(ServerMessage::Ended { reason }),
            SessionEvent::Started { .. } | SessionEvent::Greeted { .. } => None,
        }
    }
}

/// Recognizer handle that asks the client to change recognition language
pub struct WsRecognizer {
    outbound: mpsc::Sender<ServerMessage>,
}

impl WsRecognizer {
    pub fn new(outbound: mpsc::Sender<ServerMessage>) -> Self {
        Self { outbound }
    }
}

#[async_trait]
impl SpeechRecognizer for WsRecognizer {
    async fn set_language(&self, language_id: &str) -> Result<()> {
        self.outbound
            .send(ServerMessage::RecognizerLanguage {
                language: language_id.to_string(),
            })
            .await
            .map_err(|_| Error::Recognizer("client disconnected".to_string()))
    }

    fn name(&self) -> &str {
        "websocket"
    }
}

/// Synthesizer handle that forwards voice changes and speech to the client
pub struct WsSynthesizer {
    outbound: mpsc::Sender<ServerMessage>,
    language: Mutex<String>,
}

impl WsSynthesizer {
    pub fn new(outbound: mpsc::Sender<ServerMessage>) -> Self {
        Self {
            outbound,
            language: Mutex::new(String::new()),
        }
    }

    async fn send(&self, message: ServerMessage) -> Result<()> {
        self.outbound
            .send(message)
            .await
            .map_err(|_| Error::Synthesizer("client disconnected".to_string()))
    }
}

#[async_trait]
impl SpeechSynthesizer for WsSynthesizer {
    async fn set_language(&self, language_id: &str, voice_id: &str) -> Result<()> {
        self.send(ServerMessage::Voice {
            language: language_id.to_string(),
            voice: voice_id.to_string(),
        })
        .await?;
        *self.language.lock() = language_id.to_string();
        Ok(())
    }

    async fn speak(&self, text: &str) -> Result<()> {
        let language = self.language.lock().clone();
        self.send(ServerMessage::Speak {
            text: text.to_string(),
            language,
        })
        .await
    }

    fn name(&self) -> &str {
        "websocket"
    }
}

/// Connection parameters
#[derive(Debug, Default, Deserialize)]
pub struct ConnectParams {
    /// Initial language; the configured default when absent
    pub language: Option<String>,
}

/// WebSocket handler
pub struct WebSocketHandler;

impl WebSocketHandler {
    /// Handle WebSocket upgrade
    pub async fn handle(
        ws: WebSocketUpgrade,
        State(state): State<AppState>,
        Query(params): Query<ConnectParams>,
    ) -> std::result::Result<Response, StatusCode> {
        if let Some(language) = params.language.as_deref() {
            if !state.registry.contains(language) {
                tracing::warn!(language = %language, "Rejected connection for unknown language");
                return Err(StatusCode::BAD_REQUEST);
            }
        }

        Ok(ws.on_upgrade(move |socket| Self::handle_socket(socket, state, params.language)))
    }

    /// Handle WebSocket connection
    async fn handle_socket(socket: WebSocket, state: AppState, language: Option<String>) {
        let session_id = uuid::Uuid::new_v4().to_string();
        let (mut sender, mut receiver) = socket.split();

        // Single writer; everything else goes through `outbound`
        let (outbound, mut outbound_rx) = mpsc::channel::<ServerMessage>(64);
        let writer = tokio::spawn(async move {
            while let Some(message) = outbound_rx.recv().await {
                let json = match serde_json::to_string(&message) {
                    Ok(json) => json,
                    Err(e) => {
                        tracing::error!("Failed to serialize message: {}", e);
                        continue;
                    },
                };
                if let Err(e) = sender.send(Message::Text(json)).await {
                    tracing::debug!("WebSocket send failed: {}", e);
                    break;
                }
            }
            let _ = sender.close().await;
        });

        let session = match state.open_session(
            &session_id,
            language.as_deref(),
            Arc::new(WsRecognizer::new(outbound.clone())),
            Arc::new(WsSynthesizer::new(outbound.clone())),
        ) {
            Ok(session) => session,
            Err(e) => {
                tracing::error!(error = %e, "Failed to open session");
                let _ = outbound
                    .send(ServerMessage::Error {
                        kind: "session".to_string(),
                        message: e.to_string(),
                    })
                    .await;
                drop(outbound);
                let _ = writer.await;
                return;
            },
        };
        record_session_created();

        let _ = outbound
            .send(ServerMessage::SessionInfo {
                session_id: session_id.clone(),
                language: session.state().current_id().to_string(),
                languages: state.registry.all().iter().map(|p| p.id.clone()).collect(),
            })
            .await;

        let events = session.subscribe();
        let forwarder = tokio::spawn(forward_events(
            events,
            outbound.clone(),
            state.clone(),
            session_id.clone(),
        ));

        let (input_tx, input_rx) = mpsc::channel::<SessionInput>(32);
        let conversation = tokio::spawn(session.run(input_rx));

        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(ClientMessage::Join { identity }) => {
                        state.set_identity(&session_id, &identity);
                        if input_tx
                            .send(SessionInput::ParticipantJoined { identity })
                            .await
                            .is_err()
                        {
                            break;
                        }
                    },
                    Ok(message) => {
                        let ending = message == ClientMessage::End;
                        if input_tx.send(message.into_input()).await.is_err() || ending {
                            break;
                        }
                    },
                    Err(e) => {
                        tracing::debug!(session_id = %session_id, "Invalid client message: {}", e);
                        let _ = outbound
                            .send(ServerMessage::Error {
                                kind: "invalid_message".to_string(),
                                message: e.to_string(),
                            })
                            .await;
                    },
                },
                Ok(Message::Close(_)) => break,
                Ok(_) => {},
                Err(e) => {
                    tracing::debug!(session_id = %session_id, "WebSocket error: {}", e);
                    break;
                },
            }
        }

        // Closing input ends the loop once the current turn completes
        drop(input_tx);
        match conversation.await {
            Ok(reason) => {
                tracing::info!(session_id = %session_id, reason = ?reason, "Conversation finished")
            },
            Err(e) => tracing::error!(session_id = %session_id, "Conversation task failed: {}", e),
        }
        let _ = forwarder.await;

        state.close_session(&session_id);
        drop(outbound);
        let _ = writer.await;
    }
}

/// Relay session events to the client, metrics and the session listing
async fn forward_events(
    mut events: broadcast::Receiver<SessionEvent>,
    outbound: mpsc::Sender<ServerMessage>,
    state: AppState,
    session_id: String,
) {
    loop {
        let event = match events.recv().await {
            Ok(event) => event,
            Err(broadcast::error::RecvError::Lagged(n)) => {
                tracing::warn!(session_id = %session_id, "Event forwarder lagged, missed {} events", n);
                continue;
            },
            Err(broadcast::error::RecvError::Closed) => break,
        };

        record_session_event(&event);
        if let SessionEvent::LanguageSwitched { to, .. } = &event {
            state.update_language(&session_id, to);
        }

        if let Some(message) = ServerMessage::from_event(event) {
            // Client may already be gone; keep draining so metrics stay accurate
            let _ = outbound.send(message).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polyglot_agent::SwitchTrigger;

    #[test]
    fn test_client_message_parsing() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"transcript","text":"switch to Hindi","is_final":true}"#)
                .unwrap();
        assert_eq!(
            msg,
            ClientMessage::Transcript {
                text: "switch to Hindi".into(),
                is_final: true,
                language: None,
            }
        );

        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"select_language","language":"ta-IN"}"#).unwrap();
        assert_eq!(msg.into_input(), SessionInput::SelectLanguage("ta-IN".into()));

        let msg: ClientMessage = serde_json::from_str(r#"{"type":"end"}"#).unwrap();
        assert_eq!(msg, ClientMessage::End);
    }

    #[test]
    fn test_final_transcript_carries_hint() {
        let msg = ClientMessage::Transcript {
            text: "vanakkam".into(),
            is_final: true,
            language: Some("ta-IN".into()),
        };
        match msg.into_input() {
            SessionInput::Transcript(TranscriptEvent::Final(utterance)) => {
                assert_eq!(utterance.source_language_hint.as_deref(), Some("ta-IN"));
            },
            other => panic!("unexpected input: {:?}", other),
        }
    }

    #[test]
    fn test_interim_transcript() {
        let msg = ClientMessage::Transcript {
            text: "swi".into(),
            is_final: false,
            language: None,
        };
        assert!(matches!(
            msg.into_input(),
            SessionInput::Transcript(TranscriptEvent::Interim(text)) if text == "swi"
        ));
    }

    #[test]
    fn test_event_to_server_message() {
        let message = ServerMessage::from_event(SessionEvent::LanguageSwitched {
            from: "en-US".into(),
            to: "hi-IN".into(),
            trigger: SwitchTrigger::Explicit,
            confirmation: "नमस्ते!".into(),
        })
        .unwrap();
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["type"], "language_switched");
        assert_eq!(json["trigger"], "explicit");

        assert!(ServerMessage::from_event(SessionEvent::Started {
            session_id: "s".into(),
            language: "en-US".into(),
        })
        .is_none());
    }

    #[tokio::test]
    async fn test_synthesizer_speaks_in_configured_voice() {
        let (tx, mut rx) = mpsc::channel(8);
        let recognizer = WsRecognizer::new(tx.clone());
        let synthesizer = WsSynthesizer::new(tx);

        recognizer.set_language("hi-IN").await.unwrap();
        synthesizer.set_language("hi-IN", "hi-IN-SwaraNeural").await.unwrap();
        synthesizer.speak("नमस्ते!").await.unwrap();

        assert_eq!(
            rx.recv().await,
            Some(ServerMessage::RecognizerLanguage {
                language: "hi-IN".into()
            })
        );
        assert_eq!(
            rx.recv().await,
            Some(ServerMessage::Voice {
                language: "hi-IN".into(),
                voice: "hi-IN-SwaraNeural".into()
            })
        );
        assert_eq!(
            rx.recv().await,
            Some(ServerMessage::Speak {
                text: "नमस्ते!".into(),
                language: "hi-IN".into()
            })
        );
    }

    #[tokio::test]
    async fn test_disconnected_client_fails_reconfiguration() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let synthesizer = WsSynthesizer::new(tx);
        let err = synthesizer.set_language("ta-IN", "ta-IN-PallaviNeural").await;
        assert!(matches!(err, Err(Error::Synthesizer(_))));
    }
}
