use axum::Json;
use axum::extract::State;
use edudesk_core::{AppError, CancelSignal};
use tracing::instrument;

use super::model::{Settings, UpdateSettingsDto};
use super::service::SettingsService;
use crate::docs::ErrorResponse;
use crate::middleware::auth::{RequireSettingsRead, RequireSettingsWrite};
use crate::outcome_ext::OutcomeExt;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/settings",
    responses(
        (status = 200, description = "Organisation settings", body = Settings)
    ),
    security(("bearer_auth" = [])),
    tag = "Settings"
)]
#[instrument(skip(state, cancel))]
pub async fn get_settings(
    State(state): State<AppState>,
    RequireSettingsRead(_user): RequireSettingsRead,
    cancel: CancelSignal,
) -> Result<Json<Settings>, AppError> {
    let settings = SettingsService::get(state.repos.settings.as_ref(), &cancel)
        .await
        .into_app_result()?;
    Ok(Json(settings))
}

#[utoipa::path(
    put,
    path = "/api/settings",
    request_body = UpdateSettingsDto,
    responses(
        (status = 200, description = "Settings updated", body = Settings),
        (status = 422, description = "Validation error or empty update", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Settings"
)]
#[instrument(skip(state, cancel, dto))]
pub async fn update_settings(
    State(state): State<AppState>,
    RequireSettingsWrite(_user): RequireSettingsWrite,
    cancel: CancelSignal,
    ValidatedJson(dto): ValidatedJson<UpdateSettingsDto>,
) -> Result<Json<Settings>, AppError> {
    let settings = SettingsService::update(state.repos.settings.as_ref(), dto, &cancel)
        .await
        .into_app_result()?;
    Ok(Json(settings))
}
