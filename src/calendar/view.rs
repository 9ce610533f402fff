//! View state and the rendered calendar grid.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{
    month_start, period_label, period_start, shift_months, shift_weeks, visible_days,
    week_groups, week_start, ViewMode,
};
use crate::models::{Employee, Roster, ScheduleBook, WorkStatus};
use crate::stats::percentage;

/// Navigation state of a client. Each mode keeps its own anchor so switching
/// modes never moves the other one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub mode: ViewMode,
    pub week_start: NaiveDate,
    pub month_start: NaiveDate,
}

/// Input to [`ViewState::reduce`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ViewAction {
    SetMode { mode: ViewMode },
    Previous,
    Next,
    /// Jump both anchors to the period containing `date`.
    GoTo { date: NaiveDate },
}

impl ViewState {
    /// Week view of the period containing `today`.
    pub fn new(today: NaiveDate) -> Option<Self> {
        Some(Self {
            mode: ViewMode::Week,
            week_start: week_start(today)?,
            month_start: month_start(today),
        })
    }

    /// Produce the next state. Anchors are normalized first so clients may
    /// send any date inside the period. `None` when the result would leave
    /// the representable calendar.
    pub fn reduce(self, action: ViewAction) -> Option<Self> {
        let state = Self {
            mode: self.mode,
            week_start: week_start(self.week_start)?,
            month_start: month_start(self.month_start),
        };

        match action {
            ViewAction::SetMode { mode } => Some(Self { mode, ..state }),
            ViewAction::Previous => state.step(-1),
            ViewAction::Next => state.step(1),
            ViewAction::GoTo { date } => Some(Self {
                mode: state.mode,
                week_start: week_start(date)?,
                month_start: month_start(date),
            }),
        }
    }

    fn step(self, direction: i32) -> Option<Self> {
        Some(match self.mode {
            ViewMode::Week => Self {
                week_start: shift_weeks(self.week_start, direction as i64)?,
                ..self
            },
            ViewMode::Month => Self {
                month_start: shift_months(self.month_start, direction)?,
                ..self
            },
        })
    }

    /// Anchor of the active mode.
    pub fn anchor(&self) -> NaiveDate {
        match self.mode {
            ViewMode::Week => self.week_start,
            ViewMode::Month => self.month_start,
        }
    }
}

/// Office staffing level of a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CoverageLevel {
    Good,
    Fair,
    Low,
}

impl CoverageLevel {
    pub fn from_percentage(percentage: u32) -> Self {
        if percentage >= 60 {
            CoverageLevel::Good
        } else if percentage >= 40 {
            CoverageLevel::Fair
        } else {
            CoverageLevel::Low
        }
    }
}

/// Share of the roster working from the office on one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Coverage {
    pub count: usize,
    pub total: usize,
    pub percentage: u32,
    pub level: CoverageLevel,
}

pub fn office_coverage(roster: &Roster, book: &ScheduleBook, date: NaiveDate) -> Coverage {
    let total = roster.len();
    let count = roster
        .all()
        .iter()
        .filter(|emp| book.status(&emp.id, date) == WorkStatus::Office)
        .count();
    let percentage = percentage(count as u64, total as u64);
    Coverage {
        count,
        total,
        percentage,
        level: CoverageLevel::from_percentage(percentage),
    }
}

/// One column of the grid.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub weekday: String,
    pub week_number: u32,
    pub is_week_boundary: bool,
    pub coverage: Coverage,
}

/// One row of the grid: an employee's effective status per visible day.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarRow {
    pub employee: Employee,
    pub statuses: Vec<WorkStatus>,
}

/// Everything needed to draw one period.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarView {
    pub mode: ViewMode,
    pub anchor: NaiveDate,
    pub label: String,
    pub days: Vec<CalendarDay>,
    pub rows: Vec<CalendarRow>,
}

/// Grid for the period containing `anchor`; `None` for a week that runs
/// past the calendar limits.
pub fn build_view(
    mode: ViewMode,
    anchor: NaiveDate,
    roster: &Roster,
    book: &ScheduleBook,
) -> Option<CalendarView> {
    let dates = visible_days(mode, anchor)?;

    let days = week_groups(&dates)
        .into_iter()
        .map(|group| CalendarDay {
            date: group.date,
            weekday: group.date.format("%a").to_string(),
            week_number: group.week_number,
            // week view never renders separators
            is_week_boundary: mode == ViewMode::Month && group.is_week_boundary,
            coverage: office_coverage(roster, book, group.date),
        })
        .collect();

    let rows = roster
        .all()
        .iter()
        .map(|emp| CalendarRow {
            employee: emp.clone(),
            statuses: dates.iter().map(|d| book.status(&emp.id, *d)).collect(),
        })
        .collect();

    Some(CalendarView {
        mode,
        anchor: period_start(mode, anchor)?,
        label: period_label(mode, anchor)?,
        days,
        rows,
    })
}
