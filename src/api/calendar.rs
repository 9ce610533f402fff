//! Calendar API endpoints.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{current_revision, error, out_of_range, success, today, ApiResult};
use crate::calendar::{build_view, CalendarView, ViewAction, ViewMode, ViewState};
use crate::AppState;

/// Calendar query parameters.
#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    #[serde(default)]
    pub mode: ViewMode,
    /// Any date inside the period; defaults to today.
    #[serde(default)]
    pub anchor: Option<NaiveDate>,
}

/// Request body for a navigation step.
#[derive(Debug, Deserialize)]
pub struct NavigateRequest {
    /// Current state; a fresh state for today when absent.
    #[serde(default)]
    pub state: Option<ViewState>,
    pub action: ViewAction,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigateResponse {
    pub state: ViewState,
    pub view: CalendarView,
}

/// GET /api/calendar - Visible days, statuses and coverage for one period.
pub async fn get_calendar(
    State(state): State<AppState>,
    Query(params): Query<CalendarQuery>,
) -> ApiResult<CalendarView> {
    let revision_id = current_revision(&state).await;
    let anchor = params.anchor.unwrap_or_else(today);
    let book = state.store.snapshot().await;

    match build_view(params.mode, anchor, state.store.roster(), &book) {
        Some(view) => success(view, revision_id),
        None => error(out_of_range(anchor), revision_id),
    }
}

/// POST /api/calendar/navigate - Apply a navigation action to a view state.
pub async fn navigate_calendar(
    State(state): State<AppState>,
    Json(request): Json<NavigateRequest>,
) -> ApiResult<NavigateResponse> {
    let revision_id = current_revision(&state).await;
    let today = today();
    let book = state.store.snapshot().await;

    let current = request.state.or_else(|| ViewState::new(today));
    let navigated = current.and_then(|c| c.reduce(request.action)).and_then(|next| {
        let view = build_view(next.mode, next.anchor(), state.store.roster(), &book)?;
        Some(NavigateResponse { state: next, view })
    });

    match navigated {
        Some(response) => success(response, revision_id),
        None => {
            let date = match request.action {
                ViewAction::GoTo { date } => date,
                _ => request.state.map(|s| s.anchor()).unwrap_or(today),
            };
            error(out_of_range(date), revision_id)
        }
    }
}
