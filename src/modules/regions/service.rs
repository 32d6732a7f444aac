use edudesk_core::{CancelSignal, DataResult, Outcome};
use edudesk_db::require_changes;
use edudesk_models::RegionId;
use tracing::{info, instrument};

use super::model::{CreateRegionDto, Region};
use super::repository::RegionRepository;

pub struct RegionService;

impl RegionService {
    #[instrument(skip(regions, dto, cancel), fields(code = %dto.code))]
    pub async fn create(
        regions: &dyn RegionRepository,
        dto: CreateRegionDto,
        cancel: &CancelSignal,
    ) -> Outcome<Region> {
        cancel
            .run(async move {
                let region = regions
                    .insert(&dto.normalized_code(), dto.name.trim())
                    .await?;
                info!(region_id = %region.id, code = %region.code, "Region created");
                Ok(region)
            })
            .await
    }

    #[instrument(skip(regions, cancel))]
    pub async fn list(regions: &dyn RegionRepository, cancel: &CancelSignal) -> Outcome<DataResult<Region>> {
        cancel
            .run(async move { Ok(DataResult::new(regions.list().await?)) })
            .await
    }

    /// Deleting an unknown region is reported as `NoChanges`.
    #[instrument(skip(regions, cancel))]
    pub async fn delete(regions: &dyn RegionRepository, id: RegionId, cancel: &CancelSignal) -> Outcome {
        cancel
            .run(async move {
                require_changes(regions.delete(id).await?)?;
                info!(region_id = %id, "Region deleted");
                Ok(())
            })
            .await
    }
}
