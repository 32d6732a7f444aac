use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use edudesk_core::{AppError, CancelSignal, DataResult, PaginationParams};
use edudesk_models::PlanId;
use tracing::instrument;

use super::model::{CreatePlanDto, Plan, UpdatePlanDto};
use super::service::PlanService;
use crate::docs::ErrorResponse;
use crate::middleware::auth::{RequirePlansRead, RequirePlansWrite};
use crate::outcome_ext::OutcomeExt;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/plans",
    request_body = CreatePlanDto,
    responses(
        (status = 201, description = "Plan created", body = Plan),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Plans"
)]
#[instrument(skip(state, cancel, dto))]
pub async fn create_plan(
    State(state): State<AppState>,
    RequirePlansWrite(_user): RequirePlansWrite,
    cancel: CancelSignal,
    ValidatedJson(dto): ValidatedJson<CreatePlanDto>,
) -> Result<(StatusCode, Json<Plan>), AppError> {
    let plan = PlanService::create(state.repos.plans.as_ref(), dto, &cancel)
        .await
        .into_app_result()?;
    Ok((StatusCode::CREATED, Json(plan)))
}

#[utoipa::path(
    get,
    path = "/api/plans",
    params(PaginationParams),
    responses(
        (status = 200, description = "Page of plans", body = DataResult<Plan>)
    ),
    security(("bearer_auth" = [])),
    tag = "Plans"
)]
#[instrument(skip(state, cancel))]
pub async fn list_plans(
    State(state): State<AppState>,
    RequirePlansRead(_user): RequirePlansRead,
    cancel: CancelSignal,
    Query(params): Query<PaginationParams>,
) -> Result<Json<DataResult<Plan>>, AppError> {
    let page = PlanService::list(state.repos.plans.as_ref(), params, &cancel)
        .await
        .into_app_result()?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/plans/{id}",
    params(("id" = Uuid, Path, description = "Plan ID")),
    responses(
        (status = 200, description = "Plan", body = Plan),
        (status = 404, description = "Plan not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Plans"
)]
#[instrument(skip(state, cancel))]
pub async fn get_plan(
    State(state): State<AppState>,
    RequirePlansRead(_user): RequirePlansRead,
    cancel: CancelSignal,
    Path(id): Path<PlanId>,
) -> Result<Json<Plan>, AppError> {
    let plan = PlanService::get(state.repos.plans.as_ref(), id, &cancel)
        .await
        .into_app_result()?;
    Ok(Json(plan))
}

/// Update a plan. The body must carry the version last read.
#[utoipa::path(
    put,
    path = "/api/plans/{id}",
    params(("id" = Uuid, Path, description = "Plan ID")),
    request_body = UpdatePlanDto,
    responses(
        (status = 200, description = "Plan updated", body = Plan),
        (status = 404, description = "Plan not found", body = ErrorResponse),
        (status = 409, description = "Stale version", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Plans"
)]
#[instrument(skip(state, cancel, dto))]
pub async fn update_plan(
    State(state): State<AppState>,
    RequirePlansWrite(_user): RequirePlansWrite,
    cancel: CancelSignal,
    Path(id): Path<PlanId>,
    ValidatedJson(dto): ValidatedJson<UpdatePlanDto>,
) -> Result<Json<Plan>, AppError> {
    let plan = PlanService::update(state.repos.plans.as_ref(), id, dto, &cancel)
        .await
        .into_app_result()?;
    Ok(Json(plan))
}

#[utoipa::path(
    delete,
    path = "/api/plans/{id}",
    params(("id" = Uuid, Path, description = "Plan ID")),
    responses(
        (status = 204, description = "Plan deleted"),
        (status = 404, description = "Plan not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Plans"
)]
#[instrument(skip(state, cancel))]
pub async fn delete_plan(
    State(state): State<AppState>,
    RequirePlansWrite(_user): RequirePlansWrite,
    cancel: CancelSignal,
    Path(id): Path<PlanId>,
) -> Result<StatusCode, AppError> {
    PlanService::delete(state.repos.plans.as_ref(), id, &cancel)
        .await
        .into_app_result()?;
    Ok(StatusCode::NO_CONTENT)
}
