//! Calendar read model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::sessions::ClassSession;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CalendarDay {
    pub date: NaiveDate,
    /// English weekday name, e.g. `Mon`
    pub weekday: String,
    /// Sessions starting on this day, earliest first
    pub sessions: Vec<ClassSession>,
}

/// One ISO week, Monday first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WeekView {
    pub year: i32,
    pub week: u32,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub days: Vec<CalendarDay>,
}

impl WeekView {
    pub fn session_count(&self) -> usize {
        self.days.iter().map(|day| day.sessions.len()).sum()
    }
}
