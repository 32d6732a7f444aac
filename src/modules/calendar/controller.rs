use axum::Json;
use axum::extract::{Path, State};
use edudesk_core::{AppError, CancelSignal};
use edudesk_models::calendar::WeekView;
use tracing::instrument;

use super::service::CalendarService;
use crate::docs::ErrorResponse;
use crate::middleware::auth::RequireSessionsRead;
use crate::outcome_ext::OutcomeExt;
use crate::state::AppState;

/// Seven-day view of one ISO week
#[utoipa::path(
    get,
    path = "/api/calendar/weeks/{year}/{week}",
    params(
        ("year" = i32, Path, description = "ISO year"),
        ("week" = u32, Path, description = "ISO week number (1-53)")
    ),
    responses(
        (status = 200, description = "Week view", body = WeekView),
        (status = 422, description = "Week does not exist", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Calendar"
)]
#[instrument(skip(state, cancel))]
pub async fn get_week(
    State(state): State<AppState>,
    RequireSessionsRead(_user): RequireSessionsRead,
    cancel: CancelSignal,
    Path((year, week)): Path<(i32, u32)>,
) -> Result<Json<WeekView>, AppError> {
    let view = CalendarService::week_view(state.repos.sessions.as_ref(), year, week, &cancel)
        .await
        .into_app_result()?;
    Ok(Json(view))
}
