use crate::{
    error::DoseSchedulerError,
    shared::usecase::{execute, UseCase},
};
use dose_scheduler_api_structs::get_reminder::*;
use dose_scheduler_domain::{Alarm, Reminder, ID};
use dose_scheduler_infra::DoseContext;

pub async fn get_reminder_controller(
    path_params: PathParams,
    ctx: &DoseContext,
) -> Result<APIResponse, DoseSchedulerError> {
    let usecase = GetReminderUseCase {
        reminder_id: path_params.reminder_id,
    };

    execute(usecase, ctx)
        .await
        .map(|res| APIResponse::new(res.reminder, res.alarm))
        .map_err(DoseSchedulerError::from)
}

#[derive(Debug)]
pub struct GetReminderUseCase {
    pub reminder_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
}

impl From<UseCaseError> for DoseSchedulerError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(reminder_id) => Self::NotFound(format!(
                "The reminder with id: {}, was not found.",
                reminder_id
            )),
        }
    }
}

#[derive(Debug)]
pub struct UseCaseRes {
    pub reminder: Reminder,
    pub alarm: Option<Alarm>,
}

#[async_trait::async_trait]
impl UseCase for GetReminderUseCase {
    type Response = UseCaseRes;

    type Error = UseCaseError;

    const NAME: &'static str = "GetReminder";

    async fn execute(&mut self, ctx: &DoseContext) -> Result<Self::Response, Self::Error> {
        match ctx.repos.reminders.find(&self.reminder_id).await {
            Some(reminder) => {
                let alarm = ctx.repos.alarms.find(&reminder.id).await;
                Ok(UseCaseRes { reminder, alarm })
            }
            None => Err(UseCaseError::NotFound(self.reminder_id)),
        }
    }
}
