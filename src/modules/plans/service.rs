use edudesk_core::error_info::PersistenceError;
use edudesk_core::{CancelSignal, DataResult, ErrorInfo, Outcome, PaginationMeta, PaginationParams};
use edudesk_models::PlanId;
use tracing::{info, instrument, warn};

use super::model::{CreatePlanDto, Plan, UpdatePlanDto};
use super::repository::PlanRepository;

fn stale_version(id: PlanId, sent: i32) -> ErrorInfo {
    warn!(plan_id = %id, sent, "Plan update rejected, version is stale");
    ErrorInfo::persistence(PersistenceError::ConcurrencyConflict)
        .with_message("Plan was modified by another request; reload and retry")
}

pub struct PlanService;

impl PlanService {
    #[instrument(skip(plans, dto, cancel), fields(name = %dto.name))]
    pub async fn create(
        plans: &dyn PlanRepository,
        dto: CreatePlanDto,
        cancel: &CancelSignal,
    ) -> Outcome<Plan> {
        cancel
            .run(async move {
                let plan = plans.insert(&dto).await?;
                info!(plan_id = %plan.id, "Plan created");
                Ok(plan)
            })
            .await
    }

    #[instrument(skip(plans, cancel))]
    pub async fn list(
        plans: &dyn PlanRepository,
        params: PaginationParams,
        cancel: &CancelSignal,
    ) -> Outcome<DataResult<Plan>> {
        cancel
            .run(async move {
                let (data, total) = plans.list(params.limit(), params.offset()).await?;
                Ok(DataResult::paged(data, PaginationMeta::for_params(&params, total)))
            })
            .await
    }

    #[instrument(skip(plans, cancel))]
    pub async fn get(plans: &dyn PlanRepository, id: PlanId, cancel: &CancelSignal) -> Outcome<Plan> {
        cancel
            .run(async move {
                plans
                    .find(id)
                    .await?
                    .ok_or_else(|| ErrorInfo::not_found("Plan"))
            })
            .await
    }

    /// Applies `dto` if the plan is still at `dto.version`.
    #[instrument(skip(plans, dto, cancel), fields(version = dto.version))]
    pub async fn update(
        plans: &dyn PlanRepository,
        id: PlanId,
        dto: UpdatePlanDto,
        cancel: &CancelSignal,
    ) -> Outcome<Plan> {
        cancel
            .run(async move {
                let mut plan = plans
                    .find(id)
                    .await?
                    .ok_or_else(|| ErrorInfo::not_found("Plan"))?;
                if plan.version != dto.version {
                    return Err(stale_version(id, dto.version));
                }

                dto.apply_to(&mut plan);
                plans
                    .update(&plan, dto.version)
                    .await?
                    .ok_or_else(|| stale_version(id, dto.version))
            })
            .await
    }

    #[instrument(skip(plans, cancel))]
    pub async fn delete(plans: &dyn PlanRepository, id: PlanId, cancel: &CancelSignal) -> Outcome {
        cancel
            .run(async move {
                if plans.delete(id).await? == 0 {
                    return Err(ErrorInfo::not_found("Plan"));
                }
                info!(plan_id = %id, "Plan deleted");
                Ok(())
            })
            .await
    }
}
