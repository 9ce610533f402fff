//! REST API module.
//!
//! Every handler answers with the `{success, data, revisionId}` envelope.

mod calendar;
mod datastore;
mod employees;
mod rotation;
mod schedules;
mod statistics;

pub use calendar::*;
pub use datastore::*;
pub use employees::*;
pub use rotation::*;
pub use schedules::*;
pub use statistics::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde::Serialize;

use crate::errors::{AppError, AppErrorWithRevision};
use crate::AppState;

/// `{success: true, data, revisionId}`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    pub revision_id: i64,
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, AppErrorWithRevision>;

pub fn success<T: Serialize>(data: T, revision_id: i64) -> ApiResult<T> {
    Ok(ApiResponse {
        success: true,
        data,
        revision_id,
    })
}

pub fn error<T: Serialize>(error: AppError, revision_id: i64) -> ApiResult<T> {
    Err(AppErrorWithRevision { error, revision_id })
}

/// Rejection for dates whose period runs past the representable calendar.
fn out_of_range(date: NaiveDate) -> AppError {
    AppError::Validation(format!("Date out of range: {}", date))
}

/// Revision to report alongside reads; 0 if the database is unreachable.
async fn current_revision(state: &AppState) -> i64 {
    state.store.repo().get_revision_id().await.unwrap_or(0)
}

/// Server-local calendar date.
fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
