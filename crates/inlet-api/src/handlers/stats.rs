//! Analytics handler.

use axum::{extract::State, Json};
use inlet_core::MessageStats;
use tracing::{error, instrument};

use crate::{error::ApiError, state::AppState};

/// Returns aggregate statistics over all stored messages.
///
/// # Errors
///
/// Returns 500 if the aggregation query fails.
#[instrument(name = "get_stats", skip_all)]
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<MessageStats>, ApiError> {
    let stats = state.storage.messages.stats().await.map_err(|e| {
        error!(error = %e, "Failed to compute stats");
        ApiError::Storage(e)
    })?;

    Ok(Json(stats))
}
