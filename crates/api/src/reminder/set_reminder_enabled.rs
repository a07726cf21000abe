use crate::{
    alarm::scheduler::{self, AlarmError},
    error::DoseSchedulerError,
    shared::usecase::{execute, UseCase},
};
use dose_scheduler_api_structs::set_reminder_enabled::*;
use dose_scheduler_domain::{Alarm, Reminder, ID};
use dose_scheduler_infra::DoseContext;

pub async fn set_reminder_enabled_controller(
    reminder_id: ID,
    body: RequestBody,
    ctx: &DoseContext,
) -> Result<APIResponse, DoseSchedulerError> {
    let usecase = SetReminderEnabledUseCase {
        reminder_id,
        enabled: body.enabled,
    };

    execute(usecase, ctx)
        .await
        .map(|res| APIResponse::new(res.reminder, Some(res.alarm)))
        .map_err(DoseSchedulerError::from)
}

/// Disabling cancels the timer but keeps the reminder, enabling arms it again
#[derive(Debug)]
pub struct SetReminderEnabledUseCase {
    pub reminder_id: ID,
    pub enabled: bool,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
    Storage,
    Alarm(AlarmError),
}

impl From<UseCaseError> for DoseSchedulerError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(reminder_id) => Self::NotFound(format!(
                "The reminder with id: {}, was not found.",
                reminder_id
            )),
            UseCaseError::Storage => Self::InternalError,
            UseCaseError::Alarm(e) => Self::from(e),
        }
    }
}

#[derive(Debug)]
pub struct UseCaseRes {
    pub reminder: Reminder,
    pub alarm: Alarm,
}

#[async_trait::async_trait]
impl UseCase for SetReminderEnabledUseCase {
    type Response = UseCaseRes;

    type Error = UseCaseError;

    const NAME: &'static str = "SetReminderEnabled";

    async fn execute(&mut self, ctx: &DoseContext) -> Result<Self::Response, Self::Error> {
        let _guard = ctx.locks.lock(&self.reminder_id).await;
        let mut reminder = ctx
            .repos
            .reminders
            .find(&self.reminder_id)
            .await
            .ok_or(UseCaseError::NotFound(self.reminder_id))?;

        if reminder.enabled != self.enabled {
            reminder.enabled = self.enabled;
            reminder.touch(ctx.sys.get_timestamp_millis());
            ctx.repos
                .reminders
                .save(&reminder)
                .await
                .map_err(|_| UseCaseError::Storage)?;
        }

        let alarm = if reminder.enabled {
            scheduler::rearm(&reminder, ctx).await
        } else {
            scheduler::cancel(&reminder.id, ctx).await
        }
        .map_err(UseCaseError::Alarm)?;

        Ok(UseCaseRes { reminder, alarm })
    }
}
