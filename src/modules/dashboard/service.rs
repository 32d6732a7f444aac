use chrono::NaiveDate;
use edudesk_core::calendar::{iso_week_of, month_bounds};
use edudesk_core::error_info::ResourceError;
use edudesk_core::{CancelSignal, ErrorInfo, Outcome};
use edudesk_models::attendance::attendance_rate;
use edudesk_models::dashboard::DashboardSummary;
use tracing::instrument;

use crate::state::Repositories;

pub struct DashboardService;

impl DashboardService {
    /// Headline numbers for the ISO week and calendar month containing
    /// `today`. The independent reads run concurrently.
    #[instrument(skip(repos, cancel))]
    pub async fn summary(
        repos: &Repositories,
        today: NaiveDate,
        cancel: &CancelSignal,
    ) -> Outcome<DashboardSummary> {
        cancel
            .run(async move {
                let week = iso_week_of(today);
                let out_of_range = || {
                    ErrorInfo::resource(ResourceError::InvalidRange)
                        .with_message(format!("{today} is outside the supported calendar"))
                };
                let (week_start, week_end) = week.utc_range().ok_or_else(out_of_range)?;
                let (month_start, month_end) = month_bounds(today).ok_or_else(out_of_range)?;

                let (active_students, active_plans, sessions_this_week, statuses, revenue) = tokio::try_join!(
                    repos.students.count_active(),
                    repos.plans.count_active(),
                    repos.sessions.count_between(week_start, week_end),
                    repos.attendance.statuses_between(week_start, week_end),
                    repos.payments.sum_between(month_start, month_end),
                )?;

                Ok(DashboardSummary {
                    week,
                    active_students,
                    active_plans,
                    sessions_this_week,
                    attendance_rate: attendance_rate(&statuses),
                    revenue_this_month_cents: revenue,
                })
            })
            .await
    }
}
