//! Request observation middleware.
//!
//! Assigns each request an ID, counts it in `http_requests_total` by matched
//! route and status, and emits exactly one structured access log line once
//! the response is ready. Ingestion details attached by the webhook handler
//! are folded into the same line.

use axum::{
    extract::{MatchedPath, Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use inlet_core::metrics::HTTP_REQUESTS_TOTAL;
use tracing::info;
use uuid::Uuid;

use crate::{handlers::ingest::IngestRecord, state::AppState};

/// Response header echoing the request ID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Path label for requests that matched no route.
pub const UNMATCHED_PATH: &str = "unmatched";

/// Identifier assigned to a request, available to handlers as an extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

/// Observes every request passing through the router.
pub async fn observe_request(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let started = state.clock.now();
    let request_id = RequestId::generate();
    let method = req.method().clone();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| UNMATCHED_PATH.to_string(), |p| p.as_str().to_string());

    req.extensions_mut().insert(request_id.clone());

    let mut response = next.run(req).await;

    let status = response.status().as_u16();
    let latency_ms = state.clock.now().saturating_duration_since(started).as_secs_f64() * 1000.0;

    let status_label = status.to_string();
    state
        .metrics
        .increment(HTTP_REQUESTS_TOTAL, &[("path", path.as_str()), ("status", status_label.as_str())]);

    let record = response.extensions().get::<IngestRecord>();
    info!(
        target: "inlet::access",
        request_id = %request_id.0,
        method = %method,
        path = %path,
        status,
        latency_ms,
        message_id = record.and_then(|r| r.message_id.as_deref()),
        dup = record.and_then(IngestRecord::dup),
        result = record.map(|r| r.result.as_str()),
        "request completed"
    );

    if let Ok(value) = HeaderValue::from_str(&request_id.0) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}
