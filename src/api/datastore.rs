//! Datastore API endpoints.

use axum::extract::State;

use super::{error, success, ApiResult};
use crate::models::{Datastore, RevisionInfo};
use crate::AppState;

/// GET /api/datastore - Roster and schedules in one snapshot.
pub async fn get_datastore(State(state): State<AppState>) -> ApiResult<Datastore> {
    let info = match state.store.repo().get_revision_info().await {
        Ok(info) => info,
        Err(e) => return error(e, 0),
    };

    let datastore = Datastore {
        storage_key: state.store.storage_key().to_string(),
        generated_at: info.generated_at,
        revision_id: info.revision_id,
        employees: state.store.roster().all().to_vec(),
        schedules: state.store.snapshot().await.into_schedules(),
    };

    success(datastore, info.revision_id)
}

/// GET /api/datastore/revision - Get the current revision info.
pub async fn get_revision(State(state): State<AppState>) -> ApiResult<RevisionInfo> {
    match state.store.repo().get_revision_info().await {
        Ok(info) => {
            let revision_id = info.revision_id;
            success(info, revision_id)
        }
        Err(e) => error(e, 0),
    }
}
