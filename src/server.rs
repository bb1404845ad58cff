use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use tokio::sync::mpsc;

use crate::backend::status::{StatusHandle, BACKEND_ID};
use crate::backend::FlushSignal;
use crate::snapshot::MetricsSnapshot;

/// Shared state available to every admin handler via `State<Arc<AppState>>`.
pub struct AppState {
    /// Bounded queue into the backend task — overload drops signals
    /// instead of piling up cycles.
    pub signals: mpsc::Sender<FlushSignal>,

    /// Read-only view of the backend's health counters.
    pub status: StatusHandle,
}

/// Builds the admin `Router`: signal delivery in, health out.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/flush", post(trigger_flush))
        .route("/status", get(backend_status))
        .with_state(state)
}

// ─── POST /flush ─────────────────────────────────────────────────

/// One flush signal as delivered by the upstream aggregation engine.
#[derive(Debug, Deserialize)]
pub struct FlushRequest {
    pub timestamp: i64,
    pub metrics: MetricsSnapshot,
}

async fn trigger_flush(
    State(state): State<Arc<AppState>>,
    Json(request): Json<FlushRequest>,
) -> StatusCode {
    let signal = FlushSignal {
        timestamp: request.timestamp,
        snapshot: request.metrics,
    };
    match state.signals.try_send(signal) {
        Ok(()) => StatusCode::ACCEPTED,
        Err(mpsc::error::TrySendError::Full(_)) => {
            tracing::warn!("flush queue full, dropping signal");
            StatusCode::SERVICE_UNAVAILABLE
        }
        Err(mpsc::error::TrySendError::Closed(_)) => {
            tracing::error!("backend task is gone, dropping signal");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

// ─── GET /status ─────────────────────────────────────────────────

/// Answers with the four tracked counters, e.g.
/// `{"graphite":{"last_flush":…,"last_exception":…,…}}`.
async fn backend_status(State(state): State<Arc<AppState>>) -> Json<Value> {
    let mut counters = Map::new();
    state.status.report(|_backend, metric, value| {
        counters.insert(metric.to_string(), serde_json::json!(value));
    });

    let mut body = Map::new();
    body.insert(BACKEND_ID.to_string(), Value::Object(counters));
    Json(Value::Object(body))
}
