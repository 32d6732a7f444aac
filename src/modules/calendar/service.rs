use chrono::Datelike;
use edudesk_core::calendar::{IsoWeekRef, days_of_week};
use edudesk_core::error_info::ResourceError;
use edudesk_core::{CancelSignal, ErrorInfo, Outcome};
use edudesk_models::calendar::{CalendarDay, WeekView};
use edudesk_models::sessions::ClassSession;
use tracing::instrument;

use crate::modules::sessions::repository::SessionRepository;
use crate::modules::sessions::service::week_range;

/// Buckets `sessions` into the seven days of `week`, keeping each day's
/// sessions in start order. Sessions outside the week are dropped.
fn build_week(week: IsoWeekRef, mut sessions: Vec<ClassSession>) -> Option<WeekView> {
    let dates = days_of_week(week.year, week.week)?;
    sessions.sort_by_key(|session| session.starts_at);

    let mut days: Vec<CalendarDay> = dates
        .iter()
        .map(|date| CalendarDay {
            date: *date,
            weekday: date.weekday().to_string(),
            sessions: Vec::new(),
        })
        .collect();

    for session in sessions {
        let date = session.starts_at.date_naive();
        if let Some(day) = days.iter_mut().find(|day| day.date == date) {
            day.sessions.push(session);
        }
    }

    Some(WeekView {
        year: week.year,
        week: week.week,
        starts_on: *dates.first()?,
        ends_on: *dates.last()?,
        days,
    })
}

pub struct CalendarService;

impl CalendarService {
    #[instrument(skip(sessions, cancel))]
    pub async fn week_view(
        sessions: &dyn SessionRepository,
        year: i32,
        week: u32,
        cancel: &CancelSignal,
    ) -> Outcome<WeekView> {
        cancel
            .run(async move {
                let week_ref = IsoWeekRef::new(year, week)?;
                let (from, to) = week_range(year, week)?;
                let scheduled = sessions.list_between(from, to).await?;
                build_week(week_ref, scheduled).ok_or_else(|| {
                    ErrorInfo::resource(ResourceError::InvalidRange)
                        .with_message(format!("Week {week} of {year} is out of range"))
                })
            })
            .await
    }
}
