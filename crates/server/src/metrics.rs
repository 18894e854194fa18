//! Observability Metrics
//!
//! Prometheus metrics derived from session events.

use std::sync::OnceLock;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use polyglot_agent::SessionEvent;

use crate::state::AppState;
use crate::ServerError;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder
///
/// Must be called once at startup before recording any metrics.
pub fn init_metrics() -> Result<PrometheusHandle, ServerError> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| ServerError::Metrics(e.to_string()))?;

    register_default_metrics();

    METRICS_HANDLE.get_or_init(|| handle.clone());
    Ok(handle)
}

pub fn get_metrics_handle() -> Option<&'static PrometheusHandle> {
    METRICS_HANDLE.get()
}

fn register_default_metrics() {
    gauge!("polyglot_sessions_active").set(0.0);
    counter!("polyglot_sessions_created_total").absolute(0);
    counter!("polyglot_turns_total").absolute(0);
    counter!("polyglot_language_switches_total", "trigger" => "explicit").absolute(0);
    counter!("polyglot_language_switches_total", "trigger" => "detected").absolute(0);
    counter!("polyglot_switch_rejections_total").absolute(0);
    counter!("polyglot_switch_failures_total", "stage" => "recognizer").absolute(0);
    counter!("polyglot_switch_failures_total", "stage" => "synthesizer").absolute(0);
}

pub fn record_session_created() {
    counter!("polyglot_sessions_created_total").increment(1);
}

pub fn record_active_sessions(count: usize) {
    gauge!("polyglot_sessions_active").set(count as f64);
}

/// Update counters for one session event
pub fn record_session_event(event: &SessionEvent) {
    match event {
        SessionEvent::LanguageSwitched { trigger, .. } => {
            counter!("polyglot_language_switches_total", "trigger" => trigger.label()).increment(1);
        },
        SessionEvent::SwitchRejected { .. } => {
            counter!("polyglot_switch_rejections_total").increment(1);
        },
        SessionEvent::SwitchFailed { stage, .. } => {
            counter!("polyglot_switch_failures_total", "stage" => stage.clone()).increment(1);
        },
        SessionEvent::Reply { latency_ms, .. } => {
            counter!("polyglot_turns_total").increment(1);
            histogram!("polyglot_turn_latency_seconds").record(*latency_ms as f64 / 1000.0);
        },
        SessionEvent::Error { kind, .. } => {
            counter!("polyglot_errors_total", "kind" => kind.clone()).increment(1);
        },
        _ => {},
    }
}

/// Metrics endpoint handler
pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    record_active_sessions(state.session_count());

    match get_metrics_handle() {
        Some(handle) => (
            StatusCode::OK,
            [(
                header::CONTENT_TYPE,
                "text/plain; version=0.0.4; charset=utf-8",
            )],
            handle.render(),
        ),
        None => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "text/plain")],
            "Metrics disabled".to_string(),
        ),
    }
}
