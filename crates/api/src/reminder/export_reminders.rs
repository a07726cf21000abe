use crate::{
    error::DoseSchedulerError,
    shared::usecase::{execute, UseCase},
};
use dose_scheduler_api_structs::{
    dtos::{ExportBundleDTO, ReminderDTO, EXPORT_FORMAT_VERSION},
    export_reminders::*,
};
use dose_scheduler_infra::DoseContext;

pub async fn export_reminders_controller(
    ctx: &DoseContext,
) -> Result<APIResponse, DoseSchedulerError> {
    execute(ExportRemindersUseCase {}, ctx)
        .await
        .map_err(DoseSchedulerError::from)
}

#[derive(Debug)]
pub struct ExportRemindersUseCase {}

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

#[async_trait::async_trait]
impl UseCase for ExportRemindersUseCase {
    type Response = ExportBundleDTO;

    type Error = UseCaseError;

    const NAME: &'static str = "ExportReminders";

    async fn execute(&mut self, ctx: &DoseContext) -> Result<Self::Response, Self::Error> {
        let reminders = ctx
            .repos
            .reminders
            .find_all()
            .await
            .map_err(|_| UseCaseError::Storage)?;

        Ok(ExportBundleDTO {
            version: EXPORT_FORMAT_VERSION,
            exported_at: ctx.sys.get_timestamp_millis(),
            reminders: reminders.into_iter().map(ReminderDTO::new).collect(),
        })
    }
}
