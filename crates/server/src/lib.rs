//! Polyglot Voice Agent Server
//!
//! Hosts one conversation loop per WebSocket connection and exposes HTTP
//! endpoints for health, metrics and the supported-language listing.

pub mod http;
pub mod metrics;
pub mod state;
pub mod websocket;

pub use http::create_router;
pub use metrics::{init_metrics, record_session_event};
pub use state::{AppState, SessionSummary};
pub use websocket::{ClientMessage, ServerMessage, WebSocketHandler};

use thiserror::Error;

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Session error: {0}")]
    Session(String),

    #[error("WebSocket error: {0}")]
    WebSocket(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(#[from] polyglot_config::ConfigError),

    #[error("LLM error: {0}")]
    Llm(#[from] polyglot_llm::LlmError),

    #[error("Metrics error: {0}")]
    Metrics(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<polyglot_agent::AgentError> for ServerError {
    fn from(err: polyglot_agent::AgentError) -> Self {
        match err {
            polyglot_agent::AgentError::Language(msg) => ServerError::InvalidRequest(msg),
            other => ServerError::Session(other.to_string()),
        }
    }
}

impl From<ServerError> for axum::http::StatusCode {
    fn from(err: ServerError) -> Self {
        match err {
            ServerError::Session(_) => axum::http::StatusCode::NOT_FOUND,
            ServerError::WebSocket(_) => axum::http::StatusCode::BAD_REQUEST,
            ServerError::InvalidRequest(_) => axum::http::StatusCode::BAD_REQUEST,
            ServerError::Config(_)
            | ServerError::Llm(_)
            | ServerError::Metrics(_)
            | ServerError::Internal(_) => axum::http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_unknown_language_is_bad_request() {
        let err = ServerError::from(polyglot_agent::AgentError::Language("xx-XX".into()));
        assert_eq!(StatusCode::from(err), StatusCode::BAD_REQUEST);
    }
}
