//! Remote-work rotation generation.
//!
//! A hosted model proposes an office/remote split for one workweek. The
//! proposal is turned into a complete change set first and committed to the
//! store in a single write, so a bad or failed response never leaves a
//! half-applied week behind.

mod gemini;

pub use gemini::*;

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::{week_start, weekday_date};
use crate::errors::AppError;
use crate::models::{Roster, StatusChange, WorkStatus};
use crate::store::ScheduleStore;

/// Constraints text sent when the caller gives none.
pub const DEFAULT_CONSTRAINTS: &str = "None";

/// What the model is asked to plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationRequest {
    pub employee_names: Vec<String>,
    /// Always a Monday
    pub week_start: NaiveDate,
    pub constraints: String,
}

/// Only the two statuses a rotation may assign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RotationStatus {
    Office,
    Wfh,
}

impl From<RotationStatus> for WorkStatus {
    fn from(status: RotationStatus) -> Self {
        match status {
            RotationStatus::Office => WorkStatus::Office,
            RotationStatus::Wfh => WorkStatus::Wfh,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayAssignment {
    /// Weekday name, e.g. "Monday"
    pub day: String,
    pub status: RotationStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRotation {
    pub employee_name: String,
    pub schedule: Vec<DayAssignment>,
}

/// Structured model output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationResponse {
    pub schedules: Vec<EmployeeRotation>,
}

/// Source of rotation proposals.
#[async_trait]
pub trait RotationProvider: Send + Sync {
    async fn generate(&self, request: &RotationRequest) -> Result<RotationResponse, AppError>;
}

/// Validated changes derived from a model response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RotationPlan {
    pub week_start: NaiveDate,
    pub changes: Vec<StatusChange>,
    /// Returned names that matched nobody on the roster
    pub skipped_employees: Vec<String>,
    /// Assignments whose weekday name was not Monday..Friday, or whose date
    /// falls past the calendar's end
    pub skipped_days: usize,
}

/// Map a response for the week starting on Monday `week_start` onto
/// concrete (employee, date, status) changes. Unknown names and weekday
/// names are skipped rather than treated as errors.
pub fn plan_rotation(
    roster: &Roster,
    week_start: NaiveDate,
    response: &RotationResponse,
) -> RotationPlan {
    let mut plan = RotationPlan {
        week_start,
        changes: Vec::new(),
        skipped_employees: Vec::new(),
        skipped_days: 0,
    };

    for rotation in &response.schedules {
        let Some(employee) = roster.find_by_name(&rotation.employee_name) else {
            tracing::debug!("Skipping rotation for unknown employee {}", rotation.employee_name);
            plan.skipped_employees.push(rotation.employee_name.clone());
            continue;
        };

        for assignment in &rotation.schedule {
            match weekday_date(week_start, &assignment.day) {
                Some(date) => plan.changes.push(StatusChange {
                    employee_id: employee.id.clone(),
                    date,
                    status: assignment.status.into(),
                }),
                None => {
                    tracing::debug!("Skipping unknown weekday {:?}", assignment.day);
                    plan.skipped_days += 1;
                }
            }
        }
    }

    plan
}

/// Result of a committed rotation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RotationOutcome {
    pub week_start: NaiveDate,
    pub applied: usize,
    pub skipped_employees: Vec<String>,
    pub skipped_days: usize,
    #[serde(skip)]
    pub revision_id: i64,
}

/// Ask the provider for a rotation of the week containing `week_anchor`
/// and commit it atomically.
pub async fn generate_rotation(
    store: &ScheduleStore,
    provider: &dyn RotationProvider,
    week_anchor: NaiveDate,
    constraints: Option<String>,
) -> Result<RotationOutcome, AppError> {
    let week_start = week_start(week_anchor).ok_or_else(|| {
        AppError::Validation(format!("Date out of range: {}", week_anchor))
    })?;

    let request = RotationRequest {
        employee_names: store.roster().names(),
        week_start,
        constraints: constraints
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CONSTRAINTS.to_string()),
    };

    tracing::info!("Requesting rotation for week of {}", request.week_start);
    let response = provider.generate(&request).await?;

    let plan = plan_rotation(store.roster(), request.week_start, &response);
    let (applied, revision_id) = store.apply_changes(&plan.changes).await?;

    tracing::info!(
        "Applied {} rotation entries for week of {} ({} unknown employees, {} unknown days)",
        applied,
        plan.week_start,
        plan.skipped_employees.len(),
        plan.skipped_days
    );

    Ok(RotationOutcome {
        week_start: plan.week_start,
        applied,
        skipped_employees: plan.skipped_employees,
        skipped_days: plan.skipped_days,
        revision_id,
    })
}

/// Marks a rotation request as outstanding so it cannot be re-triggered.
#[derive(Debug, Default)]
pub struct BusyFlag(AtomicBool);

impl BusyFlag {
    /// `None` when another request already holds the flag.
    pub fn try_acquire(&self) -> Option<BusyGuard<'_>> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard(&self.0))
    }

    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Releases the [`BusyFlag`] on drop.
pub struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Employee;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn two_person_roster() -> Roster {
        Roster::new(vec![
            Employee::new("a", "Ann", "Dev", "A"),
            Employee::new("b", "Bob", "Ops", "B"),
        ])
        .unwrap()
    }

    fn parse(json: &str) -> RotationResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_plan_maps_weekdays_to_dates() {
        let response = parse(
            r#"{"schedules":[
                {"employeeName":"Ann","schedule":[
                    {"day":"Monday","status":"WFH"},
                    {"day":"Friday","status":"OFFICE"}]},
                {"employeeName":"Bob","schedule":[{"day":"Wednesday","status":"WFH"}]}]}"#,
        );

        let plan = plan_rotation(&two_person_roster(), date("2024-01-01"), &response);

        assert_eq!(plan.week_start, date("2024-01-01"));
        assert_eq!(
            plan.changes,
            vec![
                StatusChange {
                    employee_id: "a".to_string(),
                    date: date("2024-01-01"),
                    status: WorkStatus::Wfh,
                },
                StatusChange {
                    employee_id: "a".to_string(),
                    date: date("2024-01-05"),
                    status: WorkStatus::Office,
                },
                StatusChange {
                    employee_id: "b".to_string(),
                    date: date("2024-01-03"),
                    status: WorkStatus::Wfh,
                },
            ]
        );
    }

    #[test]
    fn test_plan_skips_unknown_names_and_days() {
        let response = parse(
            r#"{"schedules":[
                {"employeeName":"Ghost","schedule":[{"day":"Monday","status":"WFH"}]},
                {"employeeName":"Ann","schedule":[{"day":"Saturday","status":"WFH"}]}]}"#,
        );

        let plan = plan_rotation(&two_person_roster(), date("2024-01-01"), &response);

        assert!(plan.changes.is_empty());
        assert_eq!(plan.skipped_employees, vec!["Ghost".to_string()]);
        assert_eq!(plan.skipped_days, 1);
    }

    #[test]
    fn test_plan_skips_days_past_calendar_end() {
        let response = parse(
            r#"{"schedules":[{"employeeName":"Bob","schedule":[
                {"day":"Monday","status":"WFH"},
                {"day":"Tuesday","status":"WFH"},
                {"day":"Wednesday","status":"OFFICE"},
                {"day":"Thursday","status":"OFFICE"},
                {"day":"Friday","status":"OFFICE"}]}]}"#,
        );
        let last_monday = week_start(NaiveDate::MAX).unwrap();

        let plan = plan_rotation(&two_person_roster(), last_monday, &response);

        assert_eq!(plan.changes.len() + plan.skipped_days, 5);
        assert!(plan.skipped_days > 0);
        assert!(plan.changes.iter().all(|c| c.date <= NaiveDate::MAX));
    }

    #[test]
    fn test_statuses_outside_schema_are_rejected() {
        let result = serde_json::from_str::<RotationResponse>(
            r#"{"schedules":[{"employeeName":"Ann","schedule":[{"day":"Monday","status":"VACATION"}]}]}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_busy_flag() {
        let flag = BusyFlag::default();
        let guard = flag.try_acquire();
        assert!(guard.is_some());
        assert!(flag.is_busy());
        assert!(flag.try_acquire().is_none());

        drop(guard);
        assert!(!flag.is_busy());
        assert!(flag.try_acquire().is_some());
    }
}
