use crate::{
    alarm::scheduler::{self, AlarmError},
    error::DoseSchedulerError,
    shared::usecase::{execute, UseCase},
};
use chrono::NaiveDate;
use dose_scheduler_api_structs::create_reminder::*;
use dose_scheduler_domain::{
    validation::{validate_date_range, validate_reminder},
    Alarm, Reminder, ScheduleConfig, TimeOfDay, ValidationError, ID,
};
use dose_scheduler_infra::DoseContext;

pub async fn create_reminder_controller(
    body: RequestBody,
    ctx: &DoseContext,
) -> Result<APIResponse, DoseSchedulerError> {
    let usecase = CreateReminderUseCase {
        subject_id: body.subject_id,
        hour: body.hour,
        minute: body.minute,
        schedule: body.schedule,
        start_date: body.start_date,
        end_date: body.end_date,
    };

    execute(usecase, ctx)
        .await
        .map(|res| APIResponse::new(res.reminder, Some(res.alarm)))
        .map_err(DoseSchedulerError::from)
}

#[derive(Debug)]
pub struct CreateReminderUseCase {
    pub subject_id: ID,
    pub hour: u32,
    pub minute: u32,
    pub schedule: ScheduleConfig,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug)]
pub enum UseCaseError {
    InvalidData(ValidationError),
    Storage,
    /// The reminder was stored but could not be armed
    Alarm(ID, AlarmError),
}

impl From<UseCaseError> for DoseSchedulerError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidData(e) => Self::BadClientData(e.to_string()),
            UseCaseError::Storage => Self::InternalError,
            UseCaseError::Alarm(reminder_id, AlarmError::PermissionDenied) => {
                Self::PermissionDenied(format!(
                    "The reminder with id: {}, was saved but will not fire until exact alarms are permitted.",
                    reminder_id
                ))
            }
            UseCaseError::Alarm(_, e) => Self::from(e),
        }
    }
}

impl From<ValidationError> for UseCaseError {
    fn from(e: ValidationError) -> Self {
        Self::InvalidData(e)
    }
}

#[derive(Debug)]
pub struct UseCaseRes {
    pub reminder: Reminder,
    pub alarm: Alarm,
}

#[async_trait::async_trait]
impl UseCase for CreateReminderUseCase {
    type Response = UseCaseRes;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateReminder";

    async fn execute(&mut self, ctx: &DoseContext) -> Result<Self::Response, Self::Error> {
        let time_of_day = TimeOfDay::new(self.hour, self.minute)?;
        validate_date_range(self.start_date, self.end_date)?;

        let now = ctx.sys.get_timestamp_millis();
        let mut reminder = Reminder::new(self.subject_id, time_of_day, &self.schedule, now)
            .map_err(ValidationError::from)?;
        reminder.start_date = self.start_date;
        reminder.end_date = self.end_date;
        validate_reminder(&reminder)?;

        let _guard = ctx.locks.lock(&reminder.id).await;
        ctx.repos
            .reminders
            .insert(&reminder)
            .await
            .map_err(|_| UseCaseError::Storage)?;

        match scheduler::arm(&reminder, now, ctx).await {
            Ok(alarm) => Ok(UseCaseRes { reminder, alarm }),
            Err(e) => Err(UseCaseError::Alarm(reminder.id, e)),
        }
    }
}
