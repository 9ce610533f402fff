//! Datastore snapshot returned to clients on startup.

use serde::{Deserialize, Serialize};

use super::{Employee, EmployeeSchedule};

/// Everything a client needs to render the planner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Datastore {
    pub storage_key: String,
    pub generated_at: String,
    pub revision_id: i64,
    pub employees: Vec<Employee>,
    pub schedules: Vec<EmployeeSchedule>,
}

/// Revision information for change detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionInfo {
    pub revision_id: i64,
    pub generated_at: String,
}
