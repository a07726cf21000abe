use crate::{
    alarm::scheduler::{self, AlarmError},
    error::DoseSchedulerError,
    shared::usecase::{execute, UseCase},
};
use dose_scheduler_api_structs::snooze_reminder::*;
use dose_scheduler_domain::{validation::validate_snooze_minutes, ValidationError, ID};
use dose_scheduler_infra::DoseContext;

pub async fn snooze_reminder_controller(
    reminder_id: ID,
    body: RequestBody,
    ctx: &DoseContext,
) -> Result<APIResponse, DoseSchedulerError> {
    let usecase = SnoozeReminderUseCase {
        reminder_id,
        minutes: body.minutes,
    };

    execute(usecase, ctx)
        .await
        .map(|fire_at| APIResponse {
            reminder_id,
            fire_at,
        })
        .map_err(DoseSchedulerError::from)
}

#[derive(Debug)]
pub struct SnoozeReminderUseCase {
    pub reminder_id: ID,
    /// Falls back to the configured snooze duration
    pub minutes: Option<u32>,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
    InvalidData(ValidationError),
    Disabled(ID),
    Alarm(AlarmError),
}

impl From<UseCaseError> for DoseSchedulerError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(reminder_id) => Self::NotFound(format!(
                "The reminder with id: {}, was not found.",
                reminder_id
            )),
            UseCaseError::InvalidData(e) => Self::BadClientData(e.to_string()),
            UseCaseError::Disabled(reminder_id) => Self::Conflict(format!(
                "The reminder with id: {}, is disabled and cannot be snoozed.",
                reminder_id
            )),
            UseCaseError::Alarm(e) => Self::from(e),
        }
    }
}

#[async_trait::async_trait]
impl UseCase for SnoozeReminderUseCase {
    /// Timestamp in millis of the snooze timer
    type Response = i64;

    type Error = UseCaseError;

    const NAME: &'static str = "SnoozeReminder";

    async fn execute(&mut self, ctx: &DoseContext) -> Result<Self::Response, Self::Error> {
        let minutes = validate_snooze_minutes(self.minutes.unwrap_or(ctx.config.snooze_minutes))
            .map_err(UseCaseError::InvalidData)?;

        let _guard = ctx.locks.lock(&self.reminder_id).await;
        let reminder = ctx
            .repos
            .reminders
            .find(&self.reminder_id)
            .await
            .ok_or(UseCaseError::NotFound(self.reminder_id))?;
        if !reminder.enabled {
            return Err(UseCaseError::Disabled(reminder.id));
        }

        scheduler::snooze(&reminder, minutes, ctx)
            .await
            .map_err(UseCaseError::Alarm)
    }
}
