//! Webhook ingestion handler.
//!
//! Each delivery moves through signature check, payload validation, and an
//! idempotent insert, stopping at the first failure. Every terminal step
//! increments `webhook_requests_total` with its result and attaches an
//! [`IngestRecord`] to the response for the access log.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use inlet_core::{metrics::WEBHOOK_REQUESTS_TOTAL, NewMessage};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, instrument, warn};

use crate::{error::ApiError, state::AppState};

/// Header carrying the hex HMAC-SHA256 of the raw body.
pub const SIGNATURE_HEADER: &str = "x-signature";

/// Outcome label for a delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestResult {
    /// No signature header
    MissingSignature,
    /// Signature did not verify
    InvalidSignature,
    /// Body was not a valid message
    ValidationError,
    /// New message stored
    Created,
    /// Message already stored
    Duplicate,
}

impl IngestResult {
    /// Label value used in metrics and logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingSignature => "missing_signature",
            Self::InvalidSignature => "invalid_signature",
            Self::ValidationError => "validation_error",
            Self::Created => "created",
            Self::Duplicate => "duplicate",
        }
    }
}

/// Ingestion details attached to the response extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestRecord {
    /// Terminal result of the delivery
    pub result: IngestResult,
    /// Message identifier, once the payload parsed
    pub message_id: Option<String>,
}

impl IngestRecord {
    /// Whether the message was a duplicate; `None` if it never reached the
    /// store.
    pub fn dup(&self) -> Option<bool> {
        match self.result {
            IngestResult::Created => Some(false),
            IngestResult::Duplicate => Some(true),
            _ => None,
        }
    }
}

/// Response for an accepted delivery.
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    /// Always `ok`
    pub status: &'static str,
}

/// Ingests one signed message.
///
/// Returns 200 for both new and duplicate messages; the distinction only
/// shows up in metrics and logs.
///
/// # Errors
///
/// Responds with:
/// - 401: signature header missing or signature invalid
/// - 422: body is not `{message_id, from, to, ts, text?}`
/// - 500: storage failure
#[instrument(name = "ingest_webhook", skip_all, fields(payload_size = body.len()))]
pub async fn ingest_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some(signature) = headers.get(SIGNATURE_HEADER).filter(|v| !v.is_empty()) else {
        debug!("Delivery without signature header");
        return reject(&state, IngestResult::MissingSignature, ApiError::MissingSignature);
    };

    // A header that is present but not visible ASCII can never match a hex digest.
    let verified = signature.to_str().is_ok_and(|signature| state.secret.verify(&body, signature));
    if !verified {
        warn!("Webhook signature validation failed");
        return reject(&state, IngestResult::InvalidSignature, ApiError::InvalidSignature);
    }

    let message = match parse_message(&body) {
        Ok(message) => message,
        Err(reason) => {
            debug!(error = %reason, "Rejected malformed payload");
            return reject(&state, IngestResult::ValidationError, ApiError::Validation(reason));
        },
    };

    match state.storage.messages.insert(&message).await {
        Ok(outcome) => {
            let result =
                if outcome.is_duplicate() { IngestResult::Duplicate } else { IngestResult::Created };
            debug!(message_id = %message.message_id, result = result.as_str(), "Message ingested");

            let record = IngestRecord { result, message_id: Some(message.message_id) };
            let response = (StatusCode::OK, Json(IngestResponse { status: "ok" })).into_response();
            finish(&state, record, response)
        },
        Err(e) => {
            error!(error = %e, message_id = %message.message_id, "Failed to persist message");
            ApiError::Storage(e).into_response()
        },
    }
}

/// Parses a delivery body. Only a JSON object is a message; serde would
/// otherwise also fill the fields positionally from an array.
fn parse_message(body: &[u8]) -> Result<NewMessage, String> {
    match serde_json::from_slice::<Value>(body).map_err(|e| e.to_string())? {
        value @ Value::Object(_) => serde_json::from_value(value).map_err(|e| e.to_string()),
        _ => Err("payload must be a JSON object".to_string()),
    }
}

fn reject(state: &AppState, result: IngestResult, error: ApiError) -> Response {
    finish(state, IngestRecord { result, message_id: None }, error.into_response())
}

fn finish(state: &AppState, record: IngestRecord, mut response: Response) -> Response {
    state.metrics.increment(WEBHOOK_REQUESTS_TOTAL, &[("result", record.result.as_str())]);
    response.extensions_mut().insert(record);
    response
}
