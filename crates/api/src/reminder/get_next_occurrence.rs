use crate::{
    alarm::scheduler::{self, AlarmError},
    error::DoseSchedulerError,
    shared::usecase::{execute, UseCase},
};
use dose_scheduler_api_structs::get_next_occurrence::*;
use dose_scheduler_domain::ID;
use dose_scheduler_infra::DoseContext;

/// Previews when the reminder fires next, without arming anything
pub async fn get_next_occurrence_controller(
    path_params: PathParams,
    query_params: QueryParams,
    ctx: &DoseContext,
) -> Result<APIResponse, DoseSchedulerError> {
    let usecase = GetNextOccurrenceUseCase {
        reminder_id: path_params.reminder_id,
        reference: query_params.reference,
    };

    execute(usecase, ctx)
        .await
        .map(|next_occurrence| APIResponse { next_occurrence })
        .map_err(DoseSchedulerError::from)
}

#[derive(Debug)]
pub struct GetNextOccurrenceUseCase {
    pub reminder_id: ID,
    /// Defaults to now
    pub reference: Option<i64>,
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
impl UseCase for GetNextOccurrenceUseCase {
    type Response = Option<i64>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetNextOccurrence";

    async fn execute(&mut self, ctx: &DoseContext) -> Result<Self::Response, Self::Error> {
        let reminder = ctx
            .repos
            .reminders
            .find(&self.reminder_id)
            .await
            .ok_or(UseCaseError::NotFound(self.reminder_id))?;
        let reference = self
            .reference
            .unwrap_or_else(|| ctx.sys.get_timestamp_millis());

        scheduler::next_fire_at(&reminder, reference, ctx).map_err(UseCaseError::Alarm)
    }
}
