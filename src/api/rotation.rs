//! Rotation API endpoints.

use axum::{extract::State, Json};
use chrono::NaiveDate;
use serde::Deserialize;

use super::{current_revision, error, success, today, ApiResult};
use crate::errors::AppError;
use crate::rotation::{generate_rotation, RotationOutcome};
use crate::AppState;

/// Request body for generating a rotation.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRotationRequest {
    /// Any date of the target week; defaults to the current week.
    #[serde(default)]
    pub week_start: Option<NaiveDate>,
    #[serde(default)]
    pub constraints: Option<String>,
}

/// POST /api/rotation - Generate and apply an office/remote rotation. The
/// JSON body is optional.
pub async fn generate_rotation_schedule(
    State(state): State<AppState>,
    request: Option<Json<GenerateRotationRequest>>,
) -> ApiResult<RotationOutcome> {
    // a bare POST without a JSON body plans the current week
    let request = request.map(|Json(r)| r).unwrap_or_default();

    let Some(_busy) = state.rotation_busy.try_acquire() else {
        return error(
            AppError::Conflict("A schedule is already being generated".to_string()),
            current_revision(&state).await,
        );
    };

    let anchor = request.week_start.unwrap_or_else(today);

    match generate_rotation(
        &state.store,
        state.rotation.as_ref(),
        anchor,
        request.constraints,
    )
    .await
    {
        Ok(outcome) => {
            let revision_id = outcome.revision_id;
            success(outcome, revision_id)
        }
        Err(e) => {
            tracing::error!("Rotation generation failed: {}", e);
            error(e, current_revision(&state).await)
        }
    }
}
