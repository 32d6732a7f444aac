use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use edudesk_core::{AppError, CancelSignal, DataResult};
use edudesk_models::RegionId;
use tracing::instrument;

use super::model::{CreateRegionDto, Region};
use super::service::RegionService;
use crate::docs::ErrorResponse;
use crate::middleware::auth::{RequireRegionsRead, RequireRegionsWrite};
use crate::outcome_ext::OutcomeExt;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/regions",
    request_body = CreateRegionDto,
    responses(
        (status = 201, description = "Region created", body = Region),
        (status = 409, description = "Code already in use", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Regions"
)]
#[instrument(skip(state, cancel, dto))]
pub async fn create_region(
    State(state): State<AppState>,
    RequireRegionsWrite(_user): RequireRegionsWrite,
    cancel: CancelSignal,
    ValidatedJson(dto): ValidatedJson<CreateRegionDto>,
) -> Result<(StatusCode, Json<Region>), AppError> {
    let region = RegionService::create(state.repos.regions.as_ref(), dto, &cancel)
        .await
        .into_app_result()?;
    Ok((StatusCode::CREATED, Json(region)))
}

#[utoipa::path(
    get,
    path = "/api/regions",
    responses(
        (status = 200, description = "All regions, by name", body = DataResult<Region>)
    ),
    security(("bearer_auth" = [])),
    tag = "Regions"
)]
#[instrument(skip(state, cancel))]
pub async fn list_regions(
    State(state): State<AppState>,
    RequireRegionsRead(_user): RequireRegionsRead,
    cancel: CancelSignal,
) -> Result<Json<DataResult<Region>>, AppError> {
    let regions = RegionService::list(state.repos.regions.as_ref(), &cancel)
        .await
        .into_app_result()?;
    Ok(Json(regions))
}

#[utoipa::path(
    delete,
    path = "/api/regions/{id}",
    params(("id" = Uuid, Path, description = "Region ID")),
    responses(
        (status = 204, description = "Region deleted"),
        (status = 404, description = "Nothing was deleted", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Regions"
)]
#[instrument(skip(state, cancel))]
pub async fn delete_region(
    State(state): State<AppState>,
    RequireRegionsWrite(_user): RequireRegionsWrite,
    cancel: CancelSignal,
    Path(id): Path<RegionId>,
) -> Result<StatusCode, AppError> {
    RegionService::delete(state.repos.regions.as_ref(), id, &cancel)
        .await
        .into_app_result()?;
    Ok(StatusCode::NO_CONTENT)
}
