use crate::{
    alarm::scheduler,
    error::DoseSchedulerError,
    shared::usecase::{execute, UseCase},
};
use dose_scheduler_api_structs::{
    dtos::{ExportBundleDTO, FailureDTO, ReminderDTO, EXPORT_FORMAT_VERSION},
    import_reminders::*,
};
use dose_scheduler_domain::{
    validation::validate_reminder, DaySet, Reminder, ScheduleError, TimeOfDay, ValidationError,
};
use dose_scheduler_infra::DoseContext;
use tracing::warn;

pub async fn import_reminders_controller(
    body: RequestBody,
    ctx: &DoseContext,
) -> Result<APIResponse, DoseSchedulerError> {
    execute(ImportRemindersUseCase { bundle: body }, ctx)
        .await
        .map_err(DoseSchedulerError::from)
}

/// Upserts every reminder of the bundle and arms the enabled ones.
/// A reminder that fails does not stop the rest.
#[derive(Debug)]
pub struct ImportRemindersUseCase {
    pub bundle: ExportBundleDTO,
}

#[derive(Debug)]
pub enum UseCaseError {
    UnsupportedVersion(u32),
}

impl From<UseCaseError> for DoseSchedulerError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::UnsupportedVersion(version) => Self::BadClientData(format!(
                "Export format version {} is not supported, expected at most {}.",
                version, EXPORT_FORMAT_VERSION
            )),
        }
    }
}

fn to_reminder(dto: &ReminderDTO, now: i64) -> Result<Reminder, ValidationError> {
    let schedule = dto.schedule.as_ref().ok_or_else(|| {
        ScheduleError::InvalidSchedule("The reminder has no schedule".into())
    })?;
    let reminder = Reminder {
        id: dto.id,
        subject_id: dto.subject_id,
        time_of_day: TimeOfDay::new(dto.hour, dto.minute)?,
        schedule_type: schedule.schedule_type(),
        schedule_config: Some(schedule.to_blob()?),
        start_date: dto.start_date,
        end_date: dto.end_date,
        enabled: dto.enabled,
        legacy_days: DaySet::empty(),
        created: dto.created,
        updated: now,
    };
    validate_reminder(&reminder)?;
    Ok(reminder)
}

#[async_trait::async_trait]
impl UseCase for ImportRemindersUseCase {
    type Response = APIResponse;

    type Error = UseCaseError;

    const NAME: &'static str = "ImportReminders";

    async fn execute(&mut self, ctx: &DoseContext) -> Result<Self::Response, Self::Error> {
        if self.bundle.version > EXPORT_FORMAT_VERSION {
            return Err(UseCaseError::UnsupportedVersion(self.bundle.version));
        }

        let now = ctx.sys.get_timestamp_millis();
        let mut report = APIResponse::default();
        for dto in &self.bundle.reminders {
            let reminder = match to_reminder(dto, now) {
                Ok(reminder) => reminder,
                Err(e) => {
                    warn!("Skipping invalid reminder {} in import: {}", dto.id, e);
                    report.failed.push(FailureDTO {
                        reminder_id: dto.id,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            let _guard = ctx.locks.lock(&reminder.id).await;
            if let Err(e) = ctx.repos.reminders.save(&reminder).await {
                warn!("Unable to store imported reminder {}: {:?}", reminder.id, e);
                report.failed.push(FailureDTO {
                    reminder_id: reminder.id,
                    reason: "Storage error".into(),
                });
                continue;
            }
            report.imported.push(reminder.id);

            let armed = if reminder.enabled {
                scheduler::rearm(&reminder, ctx).await
            } else {
                scheduler::cancel(&reminder.id, ctx).await
            };
            if let Err(e) = armed {
                warn!("Imported reminder {} could not be armed: {}", reminder.id, e);
                report.failed.push(FailureDTO {
                    reminder_id: reminder.id,
                    reason: e.to_string(),
                });
            }
        }
        Ok(report)
    }
}
