//! Roster API endpoints.

use axum::extract::{Path, State};
use serde::Serialize;

use super::{current_revision, error, success, ApiResult};
use crate::errors::AppError;
use crate::models::{Employee, WorkStatus};
use crate::AppState;

/// A selectable status with its display label.
#[derive(Debug, Serialize)]
pub struct StatusOption {
    pub status: WorkStatus,
    pub label: &'static str,
}

/// GET /api/employees - List the roster.
pub async fn list_employees(State(state): State<AppState>) -> ApiResult<Vec<Employee>> {
    let revision_id = current_revision(&state).await;
    success(state.store.roster().all().to_vec(), revision_id)
}

/// GET /api/employees/:id - Get a single employee.
pub async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Employee> {
    let revision_id = current_revision(&state).await;

    match state.store.roster().get(&id) {
        Some(employee) => success(employee.clone(), revision_id),
        None => error(
            AppError::NotFound(format!("Employee {} not found", id)),
            revision_id,
        ),
    }
}

/// GET /api/statuses - All work statuses in display order.
pub async fn list_statuses(State(state): State<AppState>) -> ApiResult<Vec<StatusOption>> {
    let revision_id = current_revision(&state).await;
    let options = WorkStatus::ALL
        .iter()
        .map(|status| StatusOption {
            status: *status,
            label: status.label(),
        })
        .collect();
    success(options, revision_id)
}
