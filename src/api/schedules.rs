//! Schedule API endpoints.
//!
//! References to employees missing from the roster are not errors: reads
//! report OFFICE and writes come back with `applied: false`.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{current_revision, error, out_of_range, success, ApiResult};
use crate::calendar::{visible_days, ViewMode};
use crate::errors::AppError;
use crate::models::{EmployeeSchedule, WorkStatus};
use crate::AppState;

/// Effective status of one employee on one date.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayStatus {
    pub employee_id: String,
    pub date: NaiveDate,
    pub status: WorkStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied: Option<bool>,
}

/// Request body for setting a status.
#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: WorkStatus,
}

/// Request body for clearing a period. Either explicit `dates`, or a view
/// `mode` plus `anchor` whose visible days are cleared.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearRequest {
    #[serde(default)]
    pub dates: Option<Vec<NaiveDate>>,
    #[serde(default)]
    pub mode: Option<ViewMode>,
    #[serde(default)]
    pub anchor: Option<NaiveDate>,
    /// Restrict clearing to these employees; everyone when absent
    #[serde(default)]
    pub employee_ids: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearResult {
    pub dates: Vec<NaiveDate>,
    pub removed: usize,
}

/// GET /api/schedules - All employee schedules in roster order.
pub async fn list_schedules(State(state): State<AppState>) -> ApiResult<Vec<EmployeeSchedule>> {
    let revision_id = current_revision(&state).await;
    success(state.store.snapshot().await.into_schedules(), revision_id)
}

/// GET /api/schedules/:employee_id/:date - Effective status.
pub async fn get_status(
    State(state): State<AppState>,
    Path((employee_id, date)): Path<(String, NaiveDate)>,
) -> ApiResult<DayStatus> {
    let revision_id = current_revision(&state).await;
    let status = state.store.get_status(&employee_id, date).await;

    success(
        DayStatus {
            employee_id,
            date,
            status,
            applied: None,
        },
        revision_id,
    )
}

/// PUT /api/schedules/:employee_id/:date - Set a status.
pub async fn set_status(
    State(state): State<AppState>,
    Path((employee_id, date)): Path<(String, NaiveDate)>,
    Json(request): Json<SetStatusRequest>,
) -> ApiResult<DayStatus> {
    match state
        .store
        .set_status(&employee_id, date, request.status)
        .await
    {
        Ok((applied, revision_id)) => {
            if !applied {
                tracing::debug!("Ignoring status for unknown employee {}", employee_id);
            }
            success(
                DayStatus {
                    status: state.store.get_status(&employee_id, date).await,
                    employee_id,
                    date,
                    applied: Some(applied),
                },
                revision_id,
            )
        }
        Err(e) => error(e, current_revision(&state).await),
    }
}

/// POST /api/schedules/:employee_id/:date/toggle - Office/remote toggle.
pub async fn toggle_status(
    State(state): State<AppState>,
    Path((employee_id, date)): Path<(String, NaiveDate)>,
) -> ApiResult<DayStatus> {
    match state.store.toggle_status(&employee_id, date).await {
        Ok((next, revision_id)) => success(
            DayStatus {
                employee_id,
                date,
                status: next.unwrap_or_default(),
                applied: Some(next.is_some()),
            },
            revision_id,
        ),
        Err(e) => error(e, current_revision(&state).await),
    }
}

/// POST /api/schedules/clear - Revert a period to the OFFICE default.
pub async fn clear_schedules(
    State(state): State<AppState>,
    Json(request): Json<ClearRequest>,
) -> ApiResult<ClearResult> {
    let dates = match (request.dates, request.mode, request.anchor) {
        (Some(dates), _, _) => dates,
        (None, Some(mode), Some(anchor)) => match visible_days(mode, anchor) {
            Some(dates) => dates,
            None => return error(out_of_range(anchor), current_revision(&state).await),
        },
        _ => {
            return error(
                AppError::Validation("Provide either dates or mode and anchor".to_string()),
                current_revision(&state).await,
            )
        }
    };

    match state
        .store
        .clear_range(request.employee_ids.as_deref(), &dates)
        .await
    {
        Ok((removed, revision_id)) => {
            tracing::info!("Cleared {} entries over {} dates", removed, dates.len());
            success(ClearResult { dates, removed }, revision_id)
        }
        Err(e) => error(e, current_revision(&state).await),
    }
}
