//! Attendance marking.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{AttendanceId, SessionId, StudentId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "attendance_status", rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    Excused,
}

impl AttendanceStatus {
    /// Present and late both count as attended.
    pub fn counts_as_attended(self) -> bool {
        matches!(self, AttendanceStatus::Present | AttendanceStatus::Late)
    }
}

/// One student's attendance at one session. Unique per (session, student).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AttendanceRecord {
    pub id: AttendanceId,
    pub session_id: SessionId,
    pub student_id: StudentId,
    pub status: AttendanceStatus,
    pub marked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AttendanceEntry {
    pub student_id: StudentId,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct MarkAttendanceDto {
    #[validate(length(min = 1, max = 500), nested)]
    pub entries: Vec<AttendanceEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MarkAttendanceResponse {
    /// Rows inserted or updated
    pub changes: u64,
}

/// Share of marked records that count as attended, or `None` when nothing
/// was marked.
pub fn attendance_rate<'a, I>(statuses: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a AttendanceStatus>,
{
    let (attended, marked) = statuses
        .into_iter()
        .fold((0u64, 0u64), |(attended, marked), status| {
            (attended + u64::from(status.counts_as_attended()), marked + 1)
        });
    (marked > 0).then(|| attended as f64 / marked as f64)
}
