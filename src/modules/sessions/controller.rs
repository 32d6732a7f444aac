use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use edudesk_core::{AppError, CancelSignal, DataResult};
use edudesk_models::SessionId;
use tracing::instrument;

use super::model::{ClassSession, CreateSessionDto};
use super::service::SessionService;
use crate::docs::ErrorResponse;
use crate::middleware::auth::{RequireSessionsRead, RequireSessionsWrite};
use crate::outcome_ext::OutcomeExt;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Schedule a class session
#[utoipa::path(
    post,
    path = "/api/sessions",
    request_body = CreateSessionDto,
    responses(
        (status = 201, description = "Session scheduled", body = ClassSession),
        (status = 404, description = "Plan not found", body = ErrorResponse),
        (status = 422, description = "Session ends before it starts", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Sessions"
)]
#[instrument(skip(state, cancel, dto))]
pub async fn create_session(
    State(state): State<AppState>,
    RequireSessionsWrite(_user): RequireSessionsWrite,
    cancel: CancelSignal,
    ValidatedJson(dto): ValidatedJson<CreateSessionDto>,
) -> Result<(StatusCode, Json<ClassSession>), AppError> {
    let session = SessionService::create(
        state.repos.sessions.as_ref(),
        state.repos.plans.as_ref(),
        dto,
        &cancel,
    )
    .await
    .into_app_result()?;
    Ok((StatusCode::CREATED, Json(session)))
}

#[utoipa::path(
    get,
    path = "/api/sessions/{id}",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Session", body = ClassSession),
        (status = 404, description = "Session not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Sessions"
)]
#[instrument(skip(state, cancel))]
pub async fn get_session(
    State(state): State<AppState>,
    RequireSessionsRead(_user): RequireSessionsRead,
    cancel: CancelSignal,
    Path(id): Path<SessionId>,
) -> Result<Json<ClassSession>, AppError> {
    let session = SessionService::get(state.repos.sessions.as_ref(), id, &cancel)
        .await
        .into_app_result()?;
    Ok(Json(session))
}

/// Sessions of one ISO week
#[utoipa::path(
    get,
    path = "/api/sessions/week/{year}/{week}",
    params(
        ("year" = i32, Path, description = "ISO year"),
        ("week" = u32, Path, description = "ISO week number (1-53)")
    ),
    responses(
        (status = 200, description = "Sessions of the week", body = DataResult<ClassSession>),
        (status = 422, description = "Week does not exist", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Sessions"
)]
#[instrument(skip(state, cancel))]
pub async fn list_week_sessions(
    State(state): State<AppState>,
    RequireSessionsRead(_user): RequireSessionsRead,
    cancel: CancelSignal,
    Path((year, week)): Path<(i32, u32)>,
) -> Result<Json<DataResult<ClassSession>>, AppError> {
    let sessions = SessionService::list_week(state.repos.sessions.as_ref(), year, week, &cancel)
        .await
        .into_app_result()?;
    Ok(Json(sessions))
}

#[utoipa::path(
    delete,
    path = "/api/sessions/{id}",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 204, description = "Session deleted"),
        (status = 404, description = "Session not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Sessions"
)]
#[instrument(skip(state, cancel))]
pub async fn delete_session(
    State(state): State<AppState>,
    RequireSessionsWrite(_user): RequireSessionsWrite,
    cancel: CancelSignal,
    Path(id): Path<SessionId>,
) -> Result<StatusCode, AppError> {
    SessionService::delete(state.repos.sessions.as_ref(), id, &cancel)
        .await
        .into_app_result()?;
    Ok(StatusCode::NO_CONTENT)
}
