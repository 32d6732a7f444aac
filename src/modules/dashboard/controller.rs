use axum::Json;
use axum::extract::State;
use chrono::Utc;
use edudesk_core::{AppError, CancelSignal};
use edudesk_models::dashboard::DashboardSummary;
use tracing::instrument;

use super::service::DashboardService;
use crate::middleware::auth::RequireDashboardRead;
use crate::outcome_ext::OutcomeExt;
use crate::state::AppState;

/// Headline numbers for the current week and month
#[utoipa::path(
    get,
    path = "/api/dashboard/summary",
    responses(
        (status = 200, description = "Dashboard summary", body = DashboardSummary)
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
#[instrument(skip(state, cancel))]
pub async fn get_summary(
    State(state): State<AppState>,
    RequireDashboardRead(_user): RequireDashboardRead,
    cancel: CancelSignal,
) -> Result<Json<DashboardSummary>, AppError> {
    let summary = DashboardService::summary(&state.repos, Utc::now().date_naive(), &cancel)
        .await
        .into_app_result()?;
    Ok(Json(summary))
}
