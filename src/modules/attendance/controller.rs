use axum::Json;
use axum::extract::{Path, State};
use edudesk_core::{AppError, CancelSignal, DataResult};
use edudesk_models::SessionId;
use tracing::instrument;

use super::model::{AttendanceRecord, MarkAttendanceDto, MarkAttendanceResponse};
use super::service::AttendanceService;
use crate::docs::ErrorResponse;
use crate::middleware::auth::{RequireAttendanceRead, RequireAttendanceWrite};
use crate::outcome_ext::OutcomeExt;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Mark attendance for a session
#[utoipa::path(
    put,
    path = "/api/sessions/{id}/attendance",
    params(("id" = Uuid, Path, description = "Session ID")),
    request_body = MarkAttendanceDto,
    responses(
        (status = 200, description = "Attendance recorded", body = MarkAttendanceResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 409, description = "Unknown student", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
#[instrument(skip(state, cancel, dto))]
pub async fn mark_attendance(
    State(state): State<AppState>,
    RequireAttendanceWrite(_user): RequireAttendanceWrite,
    cancel: CancelSignal,
    Path(session_id): Path<SessionId>,
    ValidatedJson(dto): ValidatedJson<MarkAttendanceDto>,
) -> Result<Json<MarkAttendanceResponse>, AppError> {
    let response = AttendanceService::mark(
        state.repos.attendance.as_ref(),
        state.repos.sessions.as_ref(),
        session_id,
        dto,
        &cancel,
    )
    .await
    .into_app_result()?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/sessions/{id}/attendance",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Attendance records", body = DataResult<AttendanceRecord>),
        (status = 404, description = "Session not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
#[instrument(skip(state, cancel))]
pub async fn list_attendance(
    State(state): State<AppState>,
    RequireAttendanceRead(_user): RequireAttendanceRead,
    cancel: CancelSignal,
    Path(session_id): Path<SessionId>,
) -> Result<Json<DataResult<AttendanceRecord>>, AppError> {
    let records = AttendanceService::list_for_session(
        state.repos.attendance.as_ref(),
        state.repos.sessions.as_ref(),
        session_id,
        &cancel,
    )
    .await
    .into_app_result()?;
    Ok(Json(records))
}
