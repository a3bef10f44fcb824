//! Liveness and readiness probes.
//!
//! Liveness only proves the process answers HTTP. Readiness additionally
//! requires a reachable store and an explicitly configured webhook secret.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{debug, error, instrument, warn};

use crate::state::AppState;

/// Overall readiness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReadinessStatus {
    /// Ready to accept deliveries
    #[serde(rename = "ready")]
    Ready,
    /// At least one check failed
    #[serde(rename = "not ready")]
    NotReady,
}

/// Store reachability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    /// Round-trip query succeeded
    Up,
    /// Round-trip query failed
    Down,
}

/// Whether the webhook secret was configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretStatus {
    /// Explicitly configured
    Set,
    /// Empty or left at the built-in default
    Missing,
}

/// Per-check results, reported only when not ready.
#[derive(Debug, Serialize)]
pub struct ReadinessChecks {
    /// Store reachability
    pub db: ComponentStatus,
    /// Secret configuration
    pub secret: SecretStatus,
}

/// Readiness response body.
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    /// Overall status
    pub status: ReadinessStatus,
    /// Check details when not ready
    #[serde(flatten)]
    pub checks: Option<ReadinessChecks>,
}

/// Runs the readiness checks.
pub async fn check_readiness(state: &AppState) -> ReadinessResponse {
    let db = match state.storage.health_check().await {
        Ok(()) => ComponentStatus::Up,
        Err(e) => {
            error!(error = %e, "Database health check failed");
            ComponentStatus::Down
        },
    };

    let secret =
        if state.secret.is_configured() { SecretStatus::Set } else { SecretStatus::Missing };

    if db == ComponentStatus::Up && secret == SecretStatus::Set {
        return ReadinessResponse { status: ReadinessStatus::Ready, checks: None };
    }

    if secret == SecretStatus::Missing {
        warn!("Webhook secret not configured");
    }

    ReadinessResponse {
        status: ReadinessStatus::NotReady,
        checks: Some(ReadinessChecks { db, secret }),
    }
}

/// Readiness endpoint: 200 when ready, 503 with per-check status otherwise.
#[instrument(name = "readiness_check", skip_all)]
pub async fn readiness_check(State(state): State<AppState>) -> Response {
    let response = check_readiness(&state).await;

    let status_code = match response.status {
        ReadinessStatus::Ready => StatusCode::OK,
        ReadinessStatus::NotReady => StatusCode::SERVICE_UNAVAILABLE,
    };

    debug!(status = ?response.status, "Readiness check completed");

    (status_code, Json(response)).into_response()
}

/// Liveness endpoint. Does not touch external dependencies.
pub async fn liveness_check() -> Response {
    (StatusCode::OK, Json(serde_json::json!({ "status": "alive" }))).into_response()
}
