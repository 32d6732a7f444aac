use chrono::Utc;
use edudesk_core::{CancelSignal, DataResult, ErrorInfo, Outcome};
use edudesk_models::SessionId;
use tracing::{info, instrument};

use super::model::{AttendanceRecord, MarkAttendanceDto, MarkAttendanceResponse};
use super::repository::AttendanceRepository;
use crate::modules::sessions::repository::SessionRepository;

pub struct AttendanceService;

impl AttendanceService {
    /// Records each entry's status for the session, replacing any earlier
    /// mark for the same student.
    #[instrument(skip(attendance, sessions, dto, cancel), fields(entries = dto.entries.len()))]
    pub async fn mark(
        attendance: &dyn AttendanceRepository,
        sessions: &dyn SessionRepository,
        session_id: SessionId,
        dto: MarkAttendanceDto,
        cancel: &CancelSignal,
    ) -> Outcome<MarkAttendanceResponse> {
        cancel
            .run(async move {
                if sessions.find(session_id).await?.is_none() {
                    return Err(ErrorInfo::not_found("Session"));
                }

                let changes = attendance
                    .upsert(session_id, &dto.entries, Utc::now())
                    .await?;
                info!(session_id = %session_id, changes, "Attendance marked");
                Ok(MarkAttendanceResponse { changes })
            })
            .await
    }

    #[instrument(skip(attendance, sessions, cancel))]
    pub async fn list_for_session(
        attendance: &dyn AttendanceRepository,
        sessions: &dyn SessionRepository,
        session_id: SessionId,
        cancel: &CancelSignal,
    ) -> Outcome<DataResult<AttendanceRecord>> {
        cancel
            .run(async move {
                if sessions.find(session_id).await?.is_none() {
                    return Err(ErrorInfo::not_found("Session"));
                }
                Ok(DataResult::new(attendance.list_for_session(session_id).await?))
            })
            .await
    }
}
