use crate::{
    alarm::scheduler::{self, AlarmError},
    error::DoseSchedulerError,
    shared::usecase::{execute, UseCase},
};
use dose_scheduler_api_structs::delete_reminder::*;
use dose_scheduler_domain::{Reminder, ID};
use dose_scheduler_infra::DoseContext;

pub async fn delete_reminder_controller(
    path_params: PathParams,
    ctx: &DoseContext,
) -> Result<APIResponse, DoseSchedulerError> {
    let usecase = DeleteReminderUseCase {
        reminder_id: path_params.reminder_id,
    };

    execute(usecase, ctx)
        .await
        .map(APIResponse::new)
        .map_err(DoseSchedulerError::from)
}

#[derive(Debug)]
pub struct DeleteReminderUseCase {
    pub reminder_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
    Alarm(AlarmError),
}

impl From<UseCaseError> for DoseSchedulerError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(reminder_id) => Self::NotFound(format!(
                "The reminder with id: {}, was not found.",
                reminder_id
            )),
            UseCaseError::Alarm(e) => Self::from(e),
        }
    }
}

#[async_trait::async_trait]
impl UseCase for DeleteReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "DeleteReminder";

    async fn execute(&mut self, ctx: &DoseContext) -> Result<Self::Response, Self::Error> {
        let guard = ctx.locks.lock(&self.reminder_id).await;
        if ctx.repos.reminders.find(&self.reminder_id).await.is_none() {
            return Err(UseCaseError::NotFound(self.reminder_id));
        }

        scheduler::cancel(&self.reminder_id, ctx)
            .await
            .map_err(UseCaseError::Alarm)?;
        let reminder = ctx
            .repos
            .reminders
            .delete(&self.reminder_id)
            .await
            .ok_or(UseCaseError::NotFound(self.reminder_id))?;
        ctx.repos.alarms.delete(&self.reminder_id).await;

        drop(guard);
        ctx.locks.forget(&self.reminder_id);
        Ok(reminder)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::test_helpers::*;
    use dose_scheduler_domain::ScheduleConfig;

    #[tokio::test]
    async fn cancels_timer_and_deletes() {
        let test = setup(millis(2024, 1, 1, 9, 0));
        let reminder = insert_reminder(&test.ctx, 8, 0, ScheduleConfig::Daily).await;
        scheduler::rearm(&reminder, &test.ctx).await.unwrap();
        scheduler::snooze(&reminder, 5, &test.ctx).await.unwrap();
        assert_eq!(test.timer.armed_count(), 2);

        let usecase = DeleteReminderUseCase {
            reminder_id: reminder.id,
        };
        let deleted = execute(usecase, &test.ctx).await.unwrap();
        assert_eq!(deleted.id, reminder.id);
        assert_eq!(test.timer.armed_count(), 0);
        assert!(test.ctx.repos.reminders.find(&reminder.id).await.is_none());
        assert!(test.ctx.repos.alarms.find(&reminder.id).await.is_none());

        let usecase = DeleteReminderUseCase {
            reminder_id: reminder.id,
        };
        match execute(usecase, &test.ctx).await {
            Err(UseCaseError::NotFound(_)) => (),
            other => panic!("Expected not found, got: {:?}", other),
        }
    }
}
