//! Statistics API endpoints.

use axum::extract::{Query, State};
use chrono::NaiveDate;
use serde::Deserialize;

use super::{current_revision, success, today, ApiResult};
use crate::stats::{compute, Scope, StatisticsReport};
use crate::AppState;

/// Statistics query parameters.
#[derive(Debug, Deserialize)]
pub struct StatisticsQuery {
    /// Reference date; defaults to today.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub scope: Scope,
}

/// GET /api/statistics - Attendance report, `null` when the scope is in the future.
pub async fn get_statistics(
    State(state): State<AppState>,
    Query(params): Query<StatisticsQuery>,
) -> ApiResult<Option<StatisticsReport>> {
    let revision_id = current_revision(&state).await;
    let today = today();
    let reference = params.date.unwrap_or(today);
    let book = state.store.snapshot().await;

    let report = compute(state.store.roster(), &book, reference, params.scope, today);
    success(report, revision_id)
}
