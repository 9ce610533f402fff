//! Schedule model: per-employee, per-date work status.
//!
//! Storage is sparse. A date with no entry means the employee is in the
//! office, and every read goes through [`ScheduleBook::status`] so that
//! default is applied in one place.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Roster;

/// Where an employee works on a given day.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkStatus {
    #[default]
    Office,
    Wfh,
    Vacation,
    Sick,
    Event,
    Meeting,
}

impl WorkStatus {
    pub const ALL: [WorkStatus; 6] = [
        WorkStatus::Office,
        WorkStatus::Wfh,
        WorkStatus::Vacation,
        WorkStatus::Sick,
        WorkStatus::Event,
        WorkStatus::Meeting,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkStatus::Office => "OFFICE",
            WorkStatus::Wfh => "WFH",
            WorkStatus::Vacation => "VACATION",
            WorkStatus::Sick => "SICK",
            WorkStatus::Event => "EVENT",
            WorkStatus::Meeting => "MEETING",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            WorkStatus::Office => "Office",
            WorkStatus::Wfh => "Remote",
            WorkStatus::Vacation => "Vacation",
            WorkStatus::Sick => "Sick",
            WorkStatus::Event => "Event",
            WorkStatus::Meeting => "Meeting",
        }
    }

    /// Quick-toggle target. Only OFFICE and WFH take part: OFFICE goes
    /// remote, anything else comes back to the office.
    pub fn toggled(self) -> WorkStatus {
        match self {
            WorkStatus::Office => WorkStatus::Wfh,
            _ => WorkStatus::Office,
        }
    }
}

/// One explicit entry for an (employee, date) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub date: NaiveDate,
    pub status: WorkStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// All explicit entries of one employee, keyed by date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeSchedule {
    pub employee_id: String,
    #[serde(default)]
    pub days: BTreeMap<NaiveDate, DaySchedule>,
}

impl EmployeeSchedule {
    pub fn empty(employee_id: &str) -> Self {
        Self {
            employee_id: employee_id.to_string(),
            days: BTreeMap::new(),
        }
    }

    /// Effective status on `date`, OFFICE when unset.
    pub fn status(&self, date: NaiveDate) -> WorkStatus {
        self.days.get(&date).map(|d| d.status).unwrap_or_default()
    }
}

/// A single pending write produced by bulk operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    pub employee_id: String,
    pub date: NaiveDate,
    pub status: WorkStatus,
}

/// The whole schedule store: exactly one [`EmployeeSchedule`] per roster
/// employee, in roster order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleBook {
    schedules: Vec<EmployeeSchedule>,
}

impl ScheduleBook {
    /// A book with an empty schedule for every roster employee.
    pub fn empty(roster: &Roster) -> Self {
        Self::reconcile(roster, Vec::new())
    }

    /// Merge persisted schedules with the roster. Missing employees get an
    /// empty schedule; schedules for ids not on the roster are dropped.
    pub fn reconcile(roster: &Roster, persisted: Vec<EmployeeSchedule>) -> Self {
        let mut by_id: BTreeMap<String, EmployeeSchedule> = persisted
            .into_iter()
            .map(|s| (s.employee_id.clone(), s))
            .collect();

        let schedules = roster
            .all()
            .iter()
            .map(|emp| {
                by_id
                    .remove(&emp.id)
                    .unwrap_or_else(|| EmployeeSchedule::empty(&emp.id))
            })
            .collect();

        if !by_id.is_empty() {
            tracing::debug!(
                "Ignoring schedules for unknown employees: {:?}",
                by_id.keys().collect::<Vec<_>>()
            );
        }

        Self { schedules }
    }

    pub fn schedules(&self) -> &[EmployeeSchedule] {
        &self.schedules
    }

    pub fn schedule(&self, employee_id: &str) -> Option<&EmployeeSchedule> {
        self.schedules.iter().find(|s| s.employee_id == employee_id)
    }

    fn schedule_mut(&mut self, employee_id: &str) -> Option<&mut EmployeeSchedule> {
        self.schedules
            .iter_mut()
            .find(|s| s.employee_id == employee_id)
    }

    /// Effective status, OFFICE for unset dates and unknown employees.
    pub fn status(&self, employee_id: &str, date: NaiveDate) -> WorkStatus {
        self.schedule(employee_id)
            .map(|s| s.status(date))
            .unwrap_or_default()
    }

    /// Upsert an entry, dropping any previous note. Returns `false` when
    /// the employee is unknown, in which case nothing changes.
    pub fn set_status(&mut self, employee_id: &str, date: NaiveDate, status: WorkStatus) -> bool {
        let Some(schedule) = self.schedule_mut(employee_id) else {
            return false;
        };
        schedule.days.insert(
            date,
            DaySchedule {
                date,
                status,
                note: None,
            },
        );
        true
    }

    /// Flip between OFFICE and WFH. Returns the new status, or `None` for
    /// an unknown employee.
    pub fn toggle_status(&mut self, employee_id: &str, date: NaiveDate) -> Option<WorkStatus> {
        let next = self.schedule(employee_id)?.status(date).toggled();
        self.set_status(employee_id, date, next);
        Some(next)
    }

    /// Remove entries for `dates`, for the given employees or everyone.
    /// Returns how many entries were removed.
    pub fn clear_range(&mut self, employee_ids: Option<&[String]>, dates: &[NaiveDate]) -> usize {
        let mut removed = 0;
        for schedule in &mut self.schedules {
            if let Some(ids) = employee_ids {
                if !ids.contains(&schedule.employee_id) {
                    continue;
                }
            }
            for date in dates {
                if schedule.days.remove(date).is_some() {
                    removed += 1;
                }
            }
        }
        removed
    }

    /// Apply a validated change set. Changes for unknown employees are
    /// skipped; returns the number applied.
    pub fn apply(&mut self, changes: &[StatusChange]) -> usize {
        changes
            .iter()
            .filter(|c| self.set_status(&c.employee_id, c.date, c.status))
            .count()
    }

    pub fn into_schedules(self) -> Vec<EmployeeSchedule> {
        self.schedules
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

    #[test]
    fn test_unset_dates_are_office() {
        let book = ScheduleBook::empty(&two_person_roster());
        assert_eq!(book.status("a", date("2024-01-02")), WorkStatus::Office);
        assert_eq!(book.status("ghost", date("2024-01-02")), WorkStatus::Office);
    }

    #[test]
    fn test_set_status_replaces_entry_and_note() {
        let mut book = ScheduleBook::empty(&two_person_roster());
        let day = date("2024-01-02");
        book.schedule_mut("a").unwrap().days.insert(
            day,
            DaySchedule {
                date: day,
                status: WorkStatus::Event,
                note: Some("offsite".to_string()),
            },
        );

        assert!(book.set_status("a", day, WorkStatus::Wfh));
        let entry = &book.schedule("a").unwrap().days[&day];
        assert_eq!(entry.status, WorkStatus::Wfh);
        assert!(entry.note.is_none());
        assert_eq!(book.status("a", date("2024-01-03")), WorkStatus::Office);
    }

    #[test]
    fn test_set_status_unknown_employee_is_noop() {
        let mut book = ScheduleBook::empty(&two_person_roster());
        let before = book.clone();
        assert!(!book.set_status("ghost", date("2024-01-02"), WorkStatus::Wfh));
        assert_eq!(book, before);
    }

    #[test]
    fn test_toggle_is_two_cycle() {
        let mut book = ScheduleBook::empty(&two_person_roster());
        let day = date("2024-01-02");

        assert_eq!(book.toggle_status("a", day), Some(WorkStatus::Wfh));
        assert_eq!(book.toggle_status("a", day), Some(WorkStatus::Office));

        book.set_status("a", day, WorkStatus::Vacation);
        assert_eq!(book.toggle_status("a", day), Some(WorkStatus::Office));
        assert_eq!(book.toggle_status("a", day), Some(WorkStatus::Wfh));
        assert_eq!(book.toggle_status("a", day), Some(WorkStatus::Office));

        assert_eq!(book.toggle_status("ghost", day), None);
    }

    #[test]
    fn test_clear_range_reverts_to_office() {
        let mut book = ScheduleBook::empty(&two_person_roster());
        let (mon, tue) = (date("2024-01-01"), date("2024-01-02"));
        book.set_status("a", mon, WorkStatus::Sick);
        book.set_status("b", tue, WorkStatus::Wfh);
        book.set_status("b", date("2024-01-08"), WorkStatus::Wfh);

        let removed = book.clear_range(None, &[mon, tue]);

        assert_eq!(removed, 2);
        assert_eq!(book.status("a", mon), WorkStatus::Office);
        assert_eq!(book.status("b", tue), WorkStatus::Office);
        assert_eq!(book.status("b", date("2024-01-08")), WorkStatus::Wfh);
    }

    #[test]
    fn test_clear_range_for_selected_employees() {
        let mut book = ScheduleBook::empty(&two_person_roster());
        let mon = date("2024-01-01");
        book.set_status("a", mon, WorkStatus::Wfh);
        book.set_status("b", mon, WorkStatus::Wfh);

        let removed = book.clear_range(Some(&["b".to_string()]), &[mon]);

        assert_eq!(removed, 1);
        assert_eq!(book.status("a", mon), WorkStatus::Wfh);
        assert_eq!(book.status("b", mon), WorkStatus::Office);
    }

    #[test]
    fn test_reconcile_against_roster() {
        let roster = two_person_roster();
        let mut persisted_b = EmployeeSchedule::empty("b");
        let day = date("2024-01-02");
        persisted_b.days.insert(
            day,
            DaySchedule {
                date: day,
                status: WorkStatus::Wfh,
                note: None,
            },
        );

        let book = ScheduleBook::reconcile(
            &roster,
            vec![EmployeeSchedule::empty("ghost"), persisted_b],
        );

        let ids: Vec<_> = book
            .schedules()
            .iter()
            .map(|s| s.employee_id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(book.status("b", day), WorkStatus::Wfh);
    }

    #[test]
    fn test_serialized_shape() {
        let mut book = ScheduleBook::empty(&two_person_roster());
        book.set_status("a", date("2024-01-02"), WorkStatus::Wfh);

        let json = serde_json::to_value(book.schedules()).unwrap();
        assert_eq!(json[0]["employeeId"], "a");
        assert_eq!(json[0]["days"]["2024-01-02"]["date"], "2024-01-02");
        assert_eq!(json[0]["days"]["2024-01-02"]["status"], "WFH");
        assert!(json[0]["days"]["2024-01-02"].get("note").is_none());
        assert_eq!(json[1]["days"], serde_json::json!({}));
    }

    #[test]
    fn test_apply_skips_unknown_employees() {
        let mut book = ScheduleBook::empty(&two_person_roster());
        let day = date("2024-01-03");
        let applied = book.apply(&[
            StatusChange {
                employee_id: "a".to_string(),
                date: day,
                status: WorkStatus::Wfh,
            },
            StatusChange {
                employee_id: "ghost".to_string(),
                date: day,
                status: WorkStatus::Wfh,
            },
        ]);
        assert_eq!(applied, 1);
        assert_eq!(book.status("a", day), WorkStatus::Wfh);
    }
}
