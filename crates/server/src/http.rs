//! HTTP Endpoints
//!
//! Health, metrics, language listing and the WebSocket entry point.

use std::time::Duration;

use axum::{
    extract::{Json, Query, State},
    http::{HeaderValue, Method, StatusCode},
    response::Response,
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::metrics::metrics_handler;
use crate::state::AppState;
use crate::websocket::{ConnectParams, WebSocketHandler};

const FALLBACK_ORIGIN: &str = "http://localhost:3000";

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let server = &state.config.server;
    let cors_layer = build_cors_layer(&server.cors_origins, server.cors_enabled);
    let timeout = Duration::from_secs(server.timeout_seconds);

    Router::new()
        .route("/api/languages", get(list_languages))
        .route("/api/sessions", get(list_sessions))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics_handler))
        .route("/ws", get(ws_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(timeout))
                .layer(cors_layer),
        )
        .with_state(state)
}

/// Build CORS layer from configured origins
///
/// - If cors_enabled is false, returns permissive layer (for dev)
/// - If no configured origin parses, allows localhost:3000 only
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        tracing::warn!("CORS is disabled - allowing all origins (NOT FOR PRODUCTION)");
        return CorsLayer::permissive();
    }

    let mut parsed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("Invalid CORS origin: {}", origin);
                None
            })
        })
        .collect();

    if parsed_origins.is_empty() {
        tracing::info!("No usable CORS origins configured, defaulting to {}", FALLBACK_ORIGIN);
        parsed_origins.push(HeaderValue::from_static(FALLBACK_ORIGIN));
    }

    tracing::info!("CORS configured with {} origins", parsed_origins.len());
    CorsLayer::new()
        .allow_origin(parsed_origins)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any)
}

/// Supported languages, default first
async fn list_languages(State(state): State<AppState>) -> Json<serde_json::Value> {
    let default = &state.config.agent.default_language;
    let languages: Vec<serde_json::Value> = state
        .registry
        .all()
        .iter()
        .map(|profile| {
            serde_json::json!({
                "id": profile.id,
                "display_name": profile.display_name,
                "native_name": profile.native_name,
                "voice_id": profile.voice_id,
                "script": profile.script.to_string(),
                "default": &profile.id == default,
            })
        })
        .collect();

    Json(serde_json::json!({
        "languages": languages,
        "count": languages.len(),
    }))
}

/// Live sessions with their current language
async fn list_sessions(State(state): State<AppState>) -> Json<serde_json::Value> {
    let sessions = state.sessions();
    Json(serde_json::json!({
        "count": sessions.len(),
        "sessions": sessions,
    }))
}

async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "languages": state.registry.len(),
        "sessions": state.session_count(),
    }))
}

/// Ready once the LLM backend answers
async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    let llm_ready =
        match tokio::time::timeout(Duration::from_secs(2), state.llm.is_available()).await {
            Ok(available) => available,
            Err(_) => {
                tracing::debug!("LLM availability check timed out");
                false
            },
        };

    let status_code = if llm_ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(serde_json::json!({
            "status": if llm_ready { "ready" } else { "not_ready" },
            "checks": {
                "llm_backend": {
                    "status": if llm_ready { "ok" } else { "unreachable" },
                    "model": state.llm.model_name(),
                },
                "sessions": {
                    "status": "ok",
                    "count": state.session_count(),
                },
            }
        })),
    )
}

/// WebSocket handler wrapper
async fn ws_handler(
    ws: axum::extract::ws::WebSocketUpgrade,
    State(state): State<AppState>,
    Query(params): Query<ConnectParams>,
) -> Result<Response, StatusCode> {
    WebSocketHandler::handle(ws, State(state), Query(params)).await
}
