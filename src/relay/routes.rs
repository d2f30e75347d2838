//! Relay HTTP surface.
//!
//! - POST /api/hit — report a violation; forwards to the actuator
//! - GET /health — liveness, uptime, forward counters

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use super::service::RelayState;
use crate::types::{HitResponse, RelayStatus};

/// Build the relay application router.
pub fn relay_app(state: RelayState) -> Router {
    Router::new()
        .route("/api/hit", post(report_hit))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn status_code(status: RelayStatus) -> StatusCode {
    match status {
        RelayStatus::Sent => StatusCode::OK,
        RelayStatus::Cooldown => StatusCode::TOO_MANY_REQUESTS,
        RelayStatus::SerialError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

async fn report_hit(State(state): State<RelayState>) -> (StatusCode, Json<HitResponse>) {
    let status = state.report_hit().await;
    (status_code(status), Json(HitResponse { status }))
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    started_at: String,
    uptime_seconds: u64,
    hits_sent: u64,
    hits_throttled: u64,
    write_failures: u64,
}

async fn health(State(state): State<RelayState>) -> Json<HealthResponse> {
    let stats = state.stats().await;
    Json(HealthResponse {
        status: "ok",
        started_at: state.started_at().to_rfc3339(),
        uptime_seconds: state.uptime_secs(),
        hits_sent: stats.hits_sent,
        hits_throttled: stats.hits_throttled,
        write_failures: stats.write_failures,
    })
}
