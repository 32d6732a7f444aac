//! Dashboard read model.

use edudesk_core::calendar::IsoWeekRef;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Headline numbers for the week and month containing a given day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DashboardSummary {
    pub week: IsoWeekRef,
    pub active_students: i64,
    pub active_plans: i64,
    pub sessions_this_week: i64,
    /// Present or late over all marked records this week; absent when
    /// nothing was marked
    pub attendance_rate: Option<f64>,
    pub revenue_this_month_cents: i64,
}
