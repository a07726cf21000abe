use crate::{
    error::DoseSchedulerError,
    shared::usecase::{execute, UseCase},
};
use dose_scheduler_api_structs::{dtos::FailureDTO, migrate_legacy_schedules::*};
use dose_scheduler_domain::{Reminder, ScheduleConfig, Weekly};
use dose_scheduler_infra::DoseContext;
use tracing::{error, info};

pub async fn migrate_legacy_schedules_controller(
    ctx: &DoseContext,
) -> Result<APIResponse, DoseSchedulerError> {
    execute(MigrateLegacySchedulesUseCase {}, ctx)
        .await
        .map_err(DoseSchedulerError::from)
}

/// Moves reminders that only have the deprecated weekday set over to a
/// stored `Weekly` schedule. Running it again finds nothing to do.
#[derive(Debug)]
pub struct MigrateLegacySchedulesUseCase {}

#[derive(Debug)]
pub enum UseCaseError {
    Storage,
}

impl From<UseCaseError> for DoseSchedulerError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::Storage => Self::InternalError,
        }
    }
}

async fn migrate(mut reminder: Reminder, ctx: &DoseContext) -> anyhow::Result<()> {
    let weekly = Weekly::from_day_set(reminder.legacy_days)?;
    reminder.set_schedule(
        &ScheduleConfig::Weekly(weekly),
        ctx.sys.get_timestamp_millis(),
    )?;
    ctx.repos.reminders.save(&reminder).await
}

#[async_trait::async_trait]
impl UseCase for MigrateLegacySchedulesUseCase {
    type Response = APIResponse;

    type Error = UseCaseError;

    const NAME: &'static str = "MigrateLegacySchedules";

    async fn execute(&mut self, ctx: &DoseContext) -> Result<Self::Response, Self::Error> {
        let reminders = ctx.repos.reminders.find_all().await.map_err(|e| {
            error!("Unable to load reminders for migration: {:?}", e);
            UseCaseError::Storage
        })?;
        let candidates = reminders
            .into_iter()
            .filter(Reminder::needs_migration)
            .collect::<Vec<_>>();

        let mut report = APIResponse {
            candidates: candidates.len(),
            ..Default::default()
        };
        for reminder in candidates {
            let reminder_id = reminder.id;
            let _guard = ctx.locks.lock(&reminder_id).await;
            match migrate(reminder, ctx).await {
                Ok(()) => report.migrated += 1,
                Err(e) => {
                    error!("Unable to migrate reminder {}: {:?}", reminder_id, e);
                    report.failed.push(FailureDTO {
                        reminder_id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        if report.candidates > 0 {
            info!(
                "Migrated {} of {} legacy reminders",
                report.migrated, report.candidates
            );
        }
        Ok(report)
    }
}
