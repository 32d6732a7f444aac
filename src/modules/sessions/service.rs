use chrono::{DateTime, Utc};
use edudesk_core::calendar::IsoWeekRef;
use edudesk_core::error_info::ResourceError;
use edudesk_core::{CancelSignal, DataResult, ErrorInfo, Outcome};
use edudesk_models::SessionId;
use tracing::{info, instrument};

use super::model::{ClassSession, CreateSessionDto};
use super::repository::SessionRepository;
use crate::modules::plans::repository::PlanRepository;

/// The half-open UTC range covered by an ISO week, validating the week.
pub(crate) fn week_range(year: i32, week: u32) -> Result<(DateTime<Utc>, DateTime<Utc>), ErrorInfo> {
    IsoWeekRef::new(year, week)?.utc_range().ok_or_else(|| {
        ErrorInfo::resource(ResourceError::InvalidRange)
            .with_message(format!("Week {week} of {year} is out of range"))
    })
}

pub struct SessionService;

impl SessionService {
    #[instrument(skip(sessions, plans, dto, cancel), fields(plan_id = %dto.plan_id))]
    pub async fn create(
        sessions: &dyn SessionRepository,
        plans: &dyn PlanRepository,
        dto: CreateSessionDto,
        cancel: &CancelSignal,
    ) -> Outcome<ClassSession> {
        cancel
            .run(async move {
                if !dto.has_valid_range() {
                    return Err(ErrorInfo::resource(ResourceError::InvalidRange)
                        .with_message("Session must end after it starts"));
                }
                if plans.find(dto.plan_id).await?.is_none() {
                    return Err(ErrorInfo::not_found("Plan"));
                }

                let session = sessions.insert(&dto).await?;
                info!(session_id = %session.id, "Session scheduled");
                Ok(session)
            })
            .await
    }

    #[instrument(skip(sessions, cancel))]
    pub async fn get(
        sessions: &dyn SessionRepository,
        id: SessionId,
        cancel: &CancelSignal,
    ) -> Outcome<ClassSession> {
        cancel
            .run(async move {
                sessions
                    .find(id)
                    .await?
                    .ok_or_else(|| ErrorInfo::not_found("Session"))
            })
            .await
    }

    /// Sessions starting in the given ISO week, earliest first.
    #[instrument(skip(sessions, cancel))]
    pub async fn list_week(
        sessions: &dyn SessionRepository,
        year: i32,
        week: u32,
        cancel: &CancelSignal,
    ) -> Outcome<DataResult<ClassSession>> {
        cancel
            .run(async move {
                let (from, to) = week_range(year, week)?;
                Ok(DataResult::new(sessions.list_between(from, to).await?))
            })
            .await
    }

    #[instrument(skip(sessions, cancel))]
    pub async fn delete(
        sessions: &dyn SessionRepository,
        id: SessionId,
        cancel: &CancelSignal,
    ) -> Outcome {
        cancel
            .run(async move {
                if sessions.delete(id).await? == 0 {
                    return Err(ErrorInfo::not_found("Session"));
                }
                info!(session_id = %id, "Session deleted");
                Ok(())
            })
            .await
    }
}
