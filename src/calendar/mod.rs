//! Calendar navigation.
//!
//! Pure date arithmetic: which workdays are visible for a view mode and an
//! anchor date, how those days group into ISO weeks, and how anchors move.

mod view;

pub use view::*;

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Weekday names understood by the rotation generator, Monday first.
pub const WEEK_DAYS: [&str; 5] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];

/// Number of workdays in a week view.
pub const WORKWEEK_LEN: u64 = 5;

/// Calendar view mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Week,
    Month,
}

/// A visible day annotated with its ISO week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekGroupDay {
    pub date: NaiveDate,
    pub week_number: u32,
    /// True when this day starts a different week than the previous day
    pub is_week_boundary: bool,
}

pub fn is_workday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Monday on or before `anchor`; `None` when that Monday is before
/// `NaiveDate::MIN`.
pub fn week_start(anchor: NaiveDate) -> Option<NaiveDate> {
    anchor.checked_sub_days(Days::new(anchor.weekday().num_days_from_monday() as u64))
}

/// First day of the anchor's month.
pub fn month_start(anchor: NaiveDate) -> NaiveDate {
    // day 1 exists in every month chrono can represent
    anchor.with_day(1).unwrap_or(anchor)
}

/// Last day of the anchor's month.
pub fn month_end(anchor: NaiveDate) -> NaiveDate {
    let month = anchor.month();
    month_start(anchor)
        .iter_days()
        .take_while(|d| d.month() == month)
        .last()
        .unwrap_or(anchor)
}

/// Monday through Friday of the anchor's week; `None` at the calendar limits.
pub fn week_days(anchor: NaiveDate) -> Option<Vec<NaiveDate>> {
    let start = week_start(anchor)?;
    (0..WORKWEEK_LEN)
        .map(|i| start.checked_add_days(Days::new(i)))
        .collect()
}

/// Every Monday..Friday date in `start..=end`, ascending.
pub fn workdays_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| is_workday(*d))
        .collect()
}

/// Every workday of the anchor's calendar month.
pub fn month_workdays(anchor: NaiveDate) -> Vec<NaiveDate> {
    workdays_between(month_start(anchor), month_end(anchor))
}

/// Days shown for `mode` around `anchor`. Only week views near the
/// calendar limits can fail.
pub fn visible_days(mode: ViewMode, anchor: NaiveDate) -> Option<Vec<NaiveDate>> {
    match mode {
        ViewMode::Week => week_days(anchor),
        ViewMode::Month => Some(month_workdays(anchor)),
    }
}

/// Tag each day with its ISO week number and whether a new week starts there.
pub fn week_groups(days: &[NaiveDate]) -> Vec<WeekGroupDay> {
    let mut previous: Option<u32> = None;
    days.iter()
        .map(|&date| {
            let week_number = date.iso_week().week();
            let is_week_boundary = previous.is_some_and(|p| p != week_number);
            previous = Some(week_number);
            WeekGroupDay {
                date,
                week_number,
                is_week_boundary,
            }
        })
        .collect()
}

/// Move a week anchor by `weeks`, landing on a Monday.
pub fn shift_weeks(anchor: NaiveDate, weeks: i64) -> Option<NaiveDate> {
    let start = week_start(anchor)?;
    let days = Days::new(weeks.unsigned_abs() * 7);
    if weeks >= 0 {
        start.checked_add_days(days)
    } else {
        start.checked_sub_days(days)
    }
}

/// Move a month anchor by `months`, landing on the first of the month.
pub fn shift_months(anchor: NaiveDate, months: i32) -> Option<NaiveDate> {
    let start = month_start(anchor);
    let delta = Months::new(months.unsigned_abs());
    if months >= 0 {
        start.checked_add_months(delta)
    } else {
        start.checked_sub_months(delta)
    }
}

/// Period anchor: the week's Monday or the month's first day.
pub fn period_start(mode: ViewMode, anchor: NaiveDate) -> Option<NaiveDate> {
    match mode {
        ViewMode::Week => week_start(anchor),
        ViewMode::Month => Some(month_start(anchor)),
    }
}

/// Header label: "January 1, 2024" for a week, "January 2024" for a month.
pub fn period_label(mode: ViewMode, anchor: NaiveDate) -> Option<String> {
    let start = period_start(mode, anchor)?;
    let format = match mode {
        ViewMode::Week => "%B %-d, %Y",
        ViewMode::Month => "%B %Y",
    };
    Some(start.format(format).to_string())
}

/// Map a weekday name (Monday..Friday) to its date in the week of
/// `week_anchor`. `None` for other names and for dates past the calendar limits.
pub fn weekday_date(week_anchor: NaiveDate, day_name: &str) -> Option<NaiveDate> {
    let index = WEEK_DAYS.iter().position(|d| *d == day_name)?;
    week_start(week_anchor)?.checked_add_days(Days::new(index as u64))
}
