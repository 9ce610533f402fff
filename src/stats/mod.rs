//! Attendance statistics.
//!
//! Counts effective statuses per employee over the workdays of a month or
//! a year, never looking past today. Unset days count as OFFICE.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::calendar::{month_end, month_start, workdays_between};
use crate::models::{Roster, ScheduleBook, WorkStatus};

/// Statistics window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    #[default]
    Month,
    Year,
}

/// Rounded integer percentage; 0 when `total` is 0.
pub fn percentage(value: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    ((value as f64 / total as f64) * 100.0).round() as u32
}

/// Count per status, always holding every status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StatusCounts(BTreeMap<WorkStatus, u32>);

impl Default for StatusCounts {
    fn default() -> Self {
        Self(WorkStatus::ALL.iter().map(|s| (*s, 0)).collect())
    }
}

impl StatusCounts {
    pub fn get(&self, status: WorkStatus) -> u32 {
        self.0.get(&status).copied().unwrap_or(0)
    }

    pub fn increment(&mut self, status: WorkStatus) {
        *self.0.entry(status).or_insert(0) += 1;
    }

    pub fn add(&mut self, other: &StatusCounts) {
        for (status, count) in &other.0 {
            *self.0.entry(*status).or_insert(0) += count;
        }
    }

    pub fn total(&self) -> u32 {
        self.0.values().sum()
    }

    pub fn percentages(&self) -> BTreeMap<WorkStatus, u32> {
        let total = self.total() as u64;
        self.0
            .iter()
            .map(|(status, count)| (*status, percentage(*count as u64, total)))
            .collect()
    }
}

/// The clipped date interval statistics were computed over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub workdays: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeStats {
    pub employee_id: String,
    pub name: String,
    pub role: String,
    pub avatar: String,
    pub total_days: u32,
    pub status_counts: StatusCounts,
    pub percentages: BTreeMap<WorkStatus, u32>,
    /// Index 0 is Monday, 4 is Friday
    pub wfh_by_weekday: [u32; 5],
    pub office_by_weekday: [u32; 5],
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub employee_id: String,
    pub name: String,
    pub office_days: u32,
    pub total_days: u32,
    pub office_percentage: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatCell {
    pub count: u32,
    /// `count / maxWfhCount`, in 0..=1
    pub intensity: f64,
    /// 0 for no WFH days, otherwise 1..=4
    pub level: u8,
}

impl HeatCell {
    fn new(count: u32, max: u32) -> Self {
        let intensity = count as f64 / max.max(1) as f64;
        let level = if count == 0 {
            0
        } else if intensity > 0.75 {
            4
        } else if intensity > 0.5 {
            3
        } else if intensity > 0.25 {
            2
        } else {
            1
        };
        Self {
            count,
            intensity,
            level,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapRow {
    pub employee_id: String,
    pub cells: [HeatCell; 5],
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsReport {
    pub scope: Scope,
    pub reference_date: NaiveDate,
    pub range: DateRange,
    pub employees: Vec<EmployeeStats>,
    pub totals: StatusCounts,
    pub total_days: u32,
    pub team_percentages: BTreeMap<WorkStatus, u32>,
    pub leaderboard: Vec<LeaderboardEntry>,
    pub max_wfh_count: u32,
    pub heatmap: Vec<HeatmapRow>,
}

/// Full interval of the scope containing `reference`.
pub fn scope_interval(scope: Scope, reference: NaiveDate) -> (NaiveDate, NaiveDate) {
    match scope {
        Scope::Month => (month_start(reference), month_end(reference)),
        Scope::Year => {
            let year = reference.year();
            let start = NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(reference);
            let end = NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(reference);
            (start, end)
        }
    }
}

/// Scope interval clipped to `today`; `None` when it starts after today.
pub fn effective_range(
    scope: Scope,
    reference: NaiveDate,
    today: NaiveDate,
) -> Option<(NaiveDate, NaiveDate)> {
    let (start, end) = scope_interval(scope, reference);
    if start > today {
        return None;
    }
    Some((start, end.min(today)))
}

/// Compute the report, or `None` when the whole scope lies in the future.
pub fn compute(
    roster: &Roster,
    book: &ScheduleBook,
    reference: NaiveDate,
    scope: Scope,
    today: NaiveDate,
) -> Option<StatisticsReport> {
    let (start, end) = effective_range(scope, reference, today)?;
    let workdays = workdays_between(start, end);

    let employees: Vec<EmployeeStats> = roster
        .all()
        .iter()
        .map(|emp| {
            let mut status_counts = StatusCounts::default();
            let mut wfh_by_weekday = [0u32; 5];
            let mut office_by_weekday = [0u32; 5];

            for date in &workdays {
                let status = book.status(&emp.id, *date);
                status_counts.increment(status);

                let dow = date.weekday().num_days_from_monday() as usize;
                match status {
                    WorkStatus::Wfh => wfh_by_weekday[dow] += 1,
                    WorkStatus::Office => office_by_weekday[dow] += 1,
                    _ => {}
                }
            }

            EmployeeStats {
                employee_id: emp.id.clone(),
                name: emp.name.clone(),
                role: emp.role.clone(),
                avatar: emp.avatar.clone(),
                total_days: status_counts.total(),
                percentages: status_counts.percentages(),
                status_counts,
                wfh_by_weekday,
                office_by_weekday,
            }
        })
        .collect();

    let mut totals = StatusCounts::default();
    for stat in &employees {
        totals.add(&stat.status_counts);
    }

    let max_wfh_count = employees
        .iter()
        .flat_map(|s| s.wfh_by_weekday)
        .max()
        .unwrap_or(0)
        .max(1);

    let heatmap = employees
        .iter()
        .map(|s| HeatmapRow {
            employee_id: s.employee_id.clone(),
            cells: s.wfh_by_weekday.map(|count| HeatCell::new(count, max_wfh_count)),
        })
        .collect();

    tracing::debug!(
        "Statistics {:?} {}: {}..={} ({} workdays)",
        scope,
        reference,
        start,
        end,
        workdays.len()
    );

    Some(StatisticsReport {
        scope,
        reference_date: reference,
        range: DateRange {
            start,
            end,
            workdays: workdays.len(),
        },
        leaderboard: leaderboard(&employees),
        total_days: totals.total(),
        team_percentages: totals.percentages(),
        totals,
        employees,
        max_wfh_count,
        heatmap,
    })
}

/// Rank employees by office share, highest first. Employees without
/// tracked days are left out.
pub fn leaderboard(stats: &[EmployeeStats]) -> Vec<LeaderboardEntry> {
    let mut ranked: Vec<&EmployeeStats> = stats.iter().filter(|s| s.total_days > 0).collect();

    // compare office/total ratios without floating point
    ranked.sort_by(|a, b| {
        let a_office = a.status_counts.get(WorkStatus::Office) as u64;
        let b_office = b.status_counts.get(WorkStatus::Office) as u64;
        let lhs = b_office * a.total_days as u64;
        let rhs = a_office * b.total_days as u64;
        lhs.cmp(&rhs)
    });

    ranked
        .into_iter()
        .enumerate()
        .map(|(i, s)| {
            let office_days = s.status_counts.get(WorkStatus::Office);
            LeaderboardEntry {
                rank: i + 1,
                employee_id: s.employee_id.clone(),
                name: s.name.clone(),
                office_days,
                total_days: s.total_days,
                office_percentage: percentage(office_days as u64, s.total_days as u64),
            }
        })
        .collect()
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
    fn test_percentage_rounding_and_zero_total() {
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(5, 0), 0);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 8), 13);
    }

    #[test]
    fn test_future_scope_is_empty() {
        let roster = two_person_roster();
        let book = ScheduleBook::empty(&roster);
        let today = date("2024-03-15");

        assert!(compute(&roster, &book, date("2024-04-02"), Scope::Month, today).is_none());
        assert!(compute(&roster, &book, date("2025-01-10"), Scope::Year, today).is_none());
    }

    #[test]
    fn test_range_is_clipped_to_today() {
        let today = date("2024-03-06");
        assert_eq!(
            effective_range(Scope::Month, date("2024-03-20"), today),
            Some((date("2024-03-01"), today))
        );
        assert_eq!(
            effective_range(Scope::Year, date("2024-03-20"), today),
            Some((date("2024-01-01"), today))
        );
        assert_eq!(
            effective_range(Scope::Month, date("2024-02-10"), today),
            Some((date("2024-02-01"), date("2024-02-29")))
        );
    }

    #[test]
    fn test_weekend_only_range_has_no_tracked_days() {
        // June 1 and 2, 2024 are Saturday and Sunday
        let roster = two_person_roster();
        let book = ScheduleBook::empty(&roster);
        let report = compute(
            &roster,
            &book,
            date("2024-06-01"),
            Scope::Month,
            date("2024-06-02"),
        )
        .unwrap();

        assert_eq!(report.range.workdays, 0);
        assert_eq!(report.total_days, 0);
        assert!(report.team_percentages.values().all(|p| *p == 0));
        assert!(report.leaderboard.is_empty());
        assert_eq!(report.max_wfh_count, 1);
    }

    #[test]
    fn test_single_week_scenario() {
        let roster = two_person_roster();
        let mut book = ScheduleBook::empty(&roster);
        book.set_status("a", date("2024-01-02"), WorkStatus::Wfh);
        // weekend entries never count
        book.set_status("b", date("2024-01-06"), WorkStatus::Wfh);

        let report = compute(
            &roster,
            &book,
            date("2024-01-01"),
            Scope::Month,
            date("2024-01-05"),
        )
        .unwrap();

        assert_eq!(report.range.workdays, 5);
        assert_eq!(report.totals.get(WorkStatus::Office), 9);
        assert_eq!(report.totals.get(WorkStatus::Wfh), 1);
        assert_eq!(report.total_days, 10);
        assert_eq!(report.employees[0].wfh_by_weekday, [0, 1, 0, 0, 0]);
        assert_eq!(report.employees[0].office_by_weekday, [1, 0, 1, 1, 1]);
        assert_eq!(report.employees[0].percentages[&WorkStatus::Office], 80);
    }

    #[test]
    fn test_totals_cover_every_workday() {
        let roster = Roster::default();
        let mut book = ScheduleBook::empty(&roster);
        let today = date("2024-12-31");
        let workdays = workdays_between(date("2024-01-01"), today);
        for (i, day) in workdays.iter().enumerate() {
            for (j, emp) in roster.all().iter().enumerate() {
                let status = WorkStatus::ALL[(i + j) % WorkStatus::ALL.len()];
                book.set_status(&emp.id, *day, status);
            }
        }

        let report = compute(&roster, &book, date("2024-07-01"), Scope::Year, today).unwrap();

        assert_eq!(report.range.workdays, 262);
        assert_eq!(
            report.total_days as usize,
            roster.len() * report.range.workdays
        );
        let summed: u32 = WorkStatus::ALL.iter().map(|s| report.totals.get(*s)).sum();
        assert_eq!(summed, report.total_days);
    }

    #[test]
    fn test_leaderboard_ordering() {
        let roster = two_person_roster();
        let mut book = ScheduleBook::empty(&roster);
        for day in ["2024-01-01", "2024-01-02", "2024-01-03"] {
            book.set_status("a", date(day), WorkStatus::Wfh);
        }
        book.set_status("b", date("2024-01-04"), WorkStatus::Sick);

        let report = compute(
            &roster,
            &book,
            date("2024-01-01"),
            Scope::Month,
            date("2024-01-05"),
        )
        .unwrap();

        let names: Vec<_> = report.leaderboard.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Bob", "Ann"]);
        assert_eq!(report.leaderboard[0].rank, 1);
        assert_eq!(report.leaderboard[0].office_percentage, 80);
        assert_eq!(report.leaderboard[1].office_percentage, 40);
    }

    #[test]
    fn test_heatmap_normalized_to_max() {
        let roster = two_person_roster();
        let mut book = ScheduleBook::empty(&roster);
        // Ann remote on every Monday of January 2024, Bob on one Friday
        for day in ["2024-01-01", "2024-01-08", "2024-01-15", "2024-01-22"] {
            book.set_status("a", date(day), WorkStatus::Wfh);
        }
        book.set_status("b", date("2024-01-05"), WorkStatus::Wfh);

        let report = compute(
            &roster,
            &book,
            date("2024-01-15"),
            Scope::Month,
            date("2024-01-31"),
        )
        .unwrap();

        assert_eq!(report.max_wfh_count, 4);
        let ann = &report.heatmap[0].cells;
        assert_eq!(ann[0].count, 4);
        assert_eq!(ann[0].level, 4);
        assert_eq!(ann[1].level, 0);
        let bob = &report.heatmap[1].cells;
        assert_eq!(bob[4].intensity, 0.25);
        assert_eq!(bob[4].level, 1);
    }

    #[test]
    fn test_serialized_counts_use_status_names() {
        let mut counts = StatusCounts::default();
        counts.increment(WorkStatus::Wfh);
        let json = serde_json::to_value(&counts).unwrap();
        assert_eq!(json["WFH"], 1);
        assert_eq!(json["OFFICE"], 0);
        assert_eq!(json.as_object().unwrap().len(), 6);
    }
}
