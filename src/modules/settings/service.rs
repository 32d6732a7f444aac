use chrono_tz::Tz;
use edudesk_core::{CancelSignal, ErrorInfo, Outcome};
use tracing::{info, instrument};

use super::model::{Settings, UpdateSettingsDto};
use super::repository::SettingsRepository;

pub struct SettingsService;

impl SettingsService {
    #[instrument(skip(settings, cancel))]
    pub async fn get(settings: &dyn SettingsRepository, cancel: &CancelSignal) -> Outcome<Settings> {
        cancel.run(settings.get()).await
    }

    #[instrument(skip(settings, dto, cancel))]
    pub async fn update(
        settings: &dyn SettingsRepository,
        dto: UpdateSettingsDto,
        cancel: &CancelSignal,
    ) -> Outcome<Settings> {
        cancel
            .run(async move {
                if dto.is_empty() {
                    return Err(ErrorInfo::invalid_input("No settings to update"));
                }
                if let Some(timezone) = &dto.timezone {
                    timezone.parse::<Tz>().map_err(|_| {
                        ErrorInfo::invalid_input(format!("Unknown timezone: {timezone}"))
                    })?;
                }
                let mut current = settings.get().await?;
                dto.apply_to(&mut current);
                let updated = settings.update(&current).await?;
                info!(currency = %updated.currency, timezone = %updated.timezone, "Settings updated");
                Ok(updated)
            })
            .await
    }
}
