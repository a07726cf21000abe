use crate::{
    alarm::scheduler::{self, AlarmError},
    error::DoseSchedulerError,
    shared::usecase::{execute, UseCase},
};
use chrono::NaiveDate;
use dose_scheduler_api_structs::update_reminder::*;
use dose_scheduler_domain::{
    validation::validate_reminder, Alarm, Reminder, ScheduleConfig, TimeOfDay, ValidationError,
    ID,
};
use dose_scheduler_infra::DoseContext;

pub async fn update_reminder_controller(
    reminder_id: ID,
    body: RequestBody,
    ctx: &DoseContext,
) -> Result<APIResponse, DoseSchedulerError> {
    let usecase = UpdateReminderUseCase {
        reminder_id,
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

/// Only the given fields are changed
#[derive(Debug, Default)]
pub struct UpdateReminderUseCase {
    pub reminder_id: ID,
    pub subject_id: Option<ID>,
    pub hour: Option<u32>,
    pub minute: Option<u32>,
    pub schedule: Option<ScheduleConfig>,
    pub start_date: Option<Option<NaiveDate>>,
    pub end_date: Option<Option<NaiveDate>>,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
    InvalidData(ValidationError),
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
            UseCaseError::InvalidData(e) => Self::BadClientData(e.to_string()),
            UseCaseError::Storage => Self::InternalError,
            UseCaseError::Alarm(e) => Self::from(e),
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
impl UseCase for UpdateReminderUseCase {
    type Response = UseCaseRes;

    type Error = UseCaseError;

    const NAME: &'static str = "UpdateReminder";

    async fn execute(&mut self, ctx: &DoseContext) -> Result<Self::Response, Self::Error> {
        let _guard = ctx.locks.lock(&self.reminder_id).await;
        let mut reminder = ctx
            .repos
            .reminders
            .find(&self.reminder_id)
            .await
            .ok_or(UseCaseError::NotFound(self.reminder_id))?;

        let now = ctx.sys.get_timestamp_millis();
        if let Some(subject_id) = self.subject_id {
            reminder.subject_id = subject_id;
        }
        if self.hour.is_some() || self.minute.is_some() {
            reminder.time_of_day = TimeOfDay::new(
                self.hour.unwrap_or_else(|| reminder.time_of_day.hour()),
                self.minute.unwrap_or_else(|| reminder.time_of_day.minute()),
            )?;
        }
        if let Some(schedule) = &self.schedule {
            reminder
                .set_schedule(schedule, now)
                .map_err(ValidationError::from)?;
        }
        if let Some(start_date) = self.start_date {
            reminder.start_date = start_date;
        }
        if let Some(end_date) = self.end_date {
            reminder.end_date = end_date;
        }
        reminder.touch(now);
        validate_reminder(&reminder)?;

        ctx.repos
            .reminders
            .save(&reminder)
            .await
            .map_err(|_| UseCaseError::Storage)?;

        let alarm = scheduler::rearm(&reminder, ctx)
            .await
            .map_err(UseCaseError::Alarm)?;
        Ok(UseCaseRes { reminder, alarm })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::test_helpers::*;
    use dose_scheduler_domain::{AlarmState, ScheduleType};

    #[tokio::test]
    async fn updates_and_rearms() {
        let test = setup(millis(2024, 1, 1, 9, 0));
        let reminder = insert_reminder(&test.ctx, 8, 0, ScheduleConfig::Daily).await;
        let alarm = scheduler::rearm(&reminder, &test.ctx).await.unwrap();
        assert_eq!(alarm.fire_at, Some(millis(2024, 1, 2, 8, 0)));

        test.sys.set(millis(2024, 1, 1, 9, 30));
        let usecase = UpdateReminderUseCase {
            reminder_id: reminder.id,
            hour: Some(21),
            schedule: Some(ScheduleConfig::WeekendOnly),
            ..Default::default()
        };
        let res = execute(usecase, &test.ctx).await.unwrap();

        assert_eq!(res.reminder.time_of_day, TimeOfDay::new(21, 0).unwrap());
        assert_eq!(res.reminder.schedule_type, ScheduleType::WeekendOnly);
        assert_eq!(res.reminder.updated, millis(2024, 1, 1, 9, 30));
        assert_eq!(res.reminder.created, reminder.created);
        // 2024-01-06 is a Saturday
        assert_eq!(res.alarm.state, AlarmState::Scheduled);
        assert_eq!(res.alarm.fire_at, Some(millis(2024, 1, 6, 21, 0)));
        assert_eq!(test.timer.armed_count(), 1);

        let stored = test.ctx.repos.reminders.find(&reminder.id).await.unwrap();
        assert_eq!(stored, res.reminder);
    }

    #[tokio::test]
    async fn clears_and_validates_dates() {
        let test = setup(millis(2024, 1, 1, 9, 0));
        let reminder = insert_reminder(&test.ctx, 8, 0, ScheduleConfig::Daily).await;

        let usecase = UpdateReminderUseCase {
            reminder_id: reminder.id,
            start_date: Some(Some(date(2024, 2, 1))),
            end_date: Some(Some(date(2024, 1, 15))),
            ..Default::default()
        };
        match execute(usecase, &test.ctx).await {
            Err(UseCaseError::InvalidData(ValidationError::StartAfterEnd { .. })) => (),
            other => panic!("Expected invalid range, got: {:?}", other),
        }
        // Nothing was stored
        let stored = test.ctx.repos.reminders.find(&reminder.id).await.unwrap();
        assert_eq!(stored.start_date, None);

        let usecase = UpdateReminderUseCase {
            reminder_id: reminder.id,
            end_date: Some(Some(date(2024, 1, 15))),
            ..Default::default()
        };
        let res = execute(usecase, &test.ctx).await.unwrap();
        assert_eq!(res.reminder.end_date, Some(date(2024, 1, 15)));

        let usecase = UpdateReminderUseCase {
            reminder_id: reminder.id,
            end_date: Some(None),
            ..Default::default()
        };
        let res = execute(usecase, &test.ctx).await.unwrap();
        assert_eq!(res.reminder.end_date, None);
    }

    #[tokio::test]
    async fn end_date_in_the_past_cancels_alarm() {
        let test = setup(millis(2024, 1, 10, 9, 0));
        let reminder = insert_reminder(&test.ctx, 8, 0, ScheduleConfig::Daily).await;
        scheduler::rearm(&reminder, &test.ctx).await.unwrap();

        let usecase = UpdateReminderUseCase {
            reminder_id: reminder.id,
            end_date: Some(Some(date(2024, 1, 5))),
            ..Default::default()
        };
        let res = execute(usecase, &test.ctx).await.unwrap();
        assert_eq!(res.alarm.state, AlarmState::Cancelled);
        assert_eq!(test.timer.armed_count(), 0);
    }
}
