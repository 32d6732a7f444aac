//! ISO-8601 week helpers used by the sessions, dashboard and calendar views.
//!
//! Weeks start on Monday. Week 1 is the week containing the year's first
//! Thursday, so a date early in January can belong to the previous ISO year
//! and a late-December date to the next one.

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error_info::{ErrorInfo, ResourceError};

/// An ISO year/week pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
pub struct IsoWeekRef {
    pub year: i32,
    pub week: u32,
}

impl IsoWeekRef {
    /// Validates the pair; weeks run from 1 to 52 or 53 depending on the year.
    pub fn new(year: i32, week: u32) -> Result<Self, ErrorInfo> {
        if week == 0 || week > weeks_in_year(year) {
            return Err(ErrorInfo::resource(ResourceError::InvalidRange)
                .with_message(format!("Week {week} does not exist in {year}")));
        }
        Ok(Self { year, week })
    }

    /// Monday of this week.
    pub fn monday(self) -> Option<NaiveDate> {
        NaiveDate::from_isoywd_opt(self.year, self.week, Weekday::Mon)
    }

    /// Half-open UTC range `[Monday 00:00, next Monday 00:00)`.
    pub fn utc_range(self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let (start, end) = week_bounds(self.year, self.week)?;
        let next_monday = end.checked_add_days(Days::new(1))?;
        Some((
            start.and_hms_opt(0, 0, 0)?.and_utc(),
            next_monday.and_hms_opt(0, 0, 0)?.and_utc(),
        ))
    }
}

/// The ISO week a date belongs to.
pub fn iso_week_of(date: NaiveDate) -> IsoWeekRef {
    let week = date.iso_week();
    IsoWeekRef {
        year: week.year(),
        week: week.week(),
    }
}

/// Number of ISO weeks in `year` (52 or 53).
pub fn weeks_in_year(year: i32) -> u32 {
    // December 28th always falls in the last ISO week of its year.
    NaiveDate::from_ymd_opt(year, 12, 28)
        .map(|d| d.iso_week().week())
        .unwrap_or(52)
}

/// Monday and Sunday of the given ISO week, or `None` if the week does not
/// exist.
pub fn week_bounds(year: i32, week: u32) -> Option<(NaiveDate, NaiveDate)> {
    let monday = NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)?;
    let sunday = monday.checked_add_days(Days::new(6))?;
    Some((monday, sunday))
}

/// The seven dates of the given ISO week, Monday first.
pub fn days_of_week(year: i32, week: u32) -> Option<Vec<NaiveDate>> {
    let (monday, _) = week_bounds(year, week)?;
    Some(monday.iter_days().take(7).collect())
}

/// First and last day of the month containing `date`.
pub fn month_bounds(date: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    let first = date.with_day(1)?;
    let last = first
        .checked_add_months(Months::new(1))?
        .pred_opt()?;
    Some((first, last))
}
