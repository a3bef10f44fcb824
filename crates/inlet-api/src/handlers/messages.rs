//! Message listing handler.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use inlet_core::{models::DEFAULT_LIMIT, Message, MessageFilter, Pagination};
use serde::{Deserialize, Serialize};
use tracing::{error, instrument};

use crate::{error::ApiError, state::AppState};

/// Query string for `GET /messages`.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// Page size, 1 to 100
    pub limit: Option<i64>,
    /// Rows to skip, at least 0
    pub offset: Option<i64>,
    /// Exact sender match (wire name `from`)
    #[serde(rename = "from")]
    pub sender: Option<String>,
    /// Inclusive lower bound on `ts`
    pub since: Option<String>,
    /// Substring of the message text
    pub q: Option<String>,
}

impl ListParams {
    fn pagination(&self) -> Result<Pagination, ApiError> {
        Ok(Pagination::new(self.limit.unwrap_or(DEFAULT_LIMIT), self.offset.unwrap_or(0))?)
    }

    /// Empty values mean "no filter".
    fn filter(self) -> MessageFilter {
        let present = |value: Option<String>| value.filter(|v| !v.is_empty());

        MessageFilter {
            sender: present(self.sender),
            since: present(self.since),
            text_contains: present(self.q),
        }
    }
}

/// Response for `GET /messages`.
#[derive(Debug, Serialize)]
pub struct ListResponse {
    /// Messages in the requested page
    pub data: Vec<Message>,
    /// Messages matching the filters, ignoring pagination
    pub total: i64,
    /// Page size used
    pub limit: i64,
    /// Offset used
    pub offset: i64,
}

/// Lists stored messages ordered by `ts` then `message_id`.
///
/// # Errors
///
/// Returns 422 for malformed or out-of-range parameters (checked before the
/// store is queried) and 500 on storage failure.
#[instrument(name = "list_messages", skip_all)]
pub async fn list_messages(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<ListResponse>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::InvalidParameter(e.body_text()))?;

    let page = params.pagination()?;
    let filter = params.filter();

    let result = state.storage.messages.query(&filter, page).await.map_err(|e| {
        error!(error = %e, "Failed to query messages");
        ApiError::Storage(e)
    })?;

    Ok(Json(ListResponse {
        data: result.messages,
        total: result.total,
        limit: page.limit(),
        offset: page.offset(),
    }))
}
