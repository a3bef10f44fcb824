//! Counter exposition handler.

use axum::{extract::State, http::header::CONTENT_TYPE, response::IntoResponse};

use crate::state::AppState;

/// Content type of the text exposition format.
pub const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Renders every counter, one per line.
pub async fn render_metrics(State(state): State<AppState>) -> impl IntoResponse {
    ([(CONTENT_TYPE, EXPOSITION_CONTENT_TYPE)], state.metrics.render_text())
}
