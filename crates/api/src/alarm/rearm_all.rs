use super::scheduler;
use crate::{
    error::DoseSchedulerError,
    shared::usecase::{execute, UseCase},
};
use dose_scheduler_api_structs::{dtos::FailureDTO, rearm_all::*};
use dose_scheduler_domain::AlarmState;
use dose_scheduler_infra::DoseContext;
use tracing::error;

/// Arms every enabled reminder, e.g. after the device booted
pub async fn rearm_all_controller(ctx: &DoseContext) -> Result<APIResponse, DoseSchedulerError> {
    execute(RearmAllUseCase {}, ctx)
        .await
        .map_err(DoseSchedulerError::from)
}

#[derive(Debug)]
pub struct RearmAllUseCase {}

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
impl UseCase for RearmAllUseCase {
    type Response = APIResponse;

    type Error = UseCaseError;

    const NAME: &'static str = "RearmAll";

    async fn execute(&mut self, ctx: &DoseContext) -> Result<Self::Response, Self::Error> {
        let reminders = ctx.repos.reminders.find_enabled().await.map_err(|e| {
            error!("Unable to load enabled reminders: {:?}", e);
            UseCaseError::Storage
        })?;

        let mut report = APIResponse::default();
        for reminder in reminders {
            let _guard = ctx.locks.lock(&reminder.id).await;
            match scheduler::rearm(&reminder, ctx).await {
                Ok(alarm) if alarm.state == AlarmState::Scheduled => {
                    report.scheduled.push(reminder.id)
                }
                Ok(_) => report.exhausted.push(reminder.id),
                Err(e) => {
                    error!("Unable to rearm reminder {}: {}", reminder.id, e);
                    report.failed.push(FailureDTO {
                        reminder_id: reminder.id,
                        reason: e.to_string(),
                    });
                }
            }
        }
        Ok(report)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::test_helpers::*;
    use dose_scheduler_domain::{ScheduleConfig, SpecificDates};

    #[tokio::test]
    async fn rearms_enabled_and_reports_the_rest() {
        let test = setup(millis(2024, 1, 10, 9, 0));
        let daily = insert_reminder(&test.ctx, 8, 0, ScheduleConfig::Daily).await;
        let dates = SpecificDates::new(vec![date(2024, 1, 5)]).unwrap();
        let exhausted =
            insert_reminder(&test.ctx, 8, 0, ScheduleConfig::SpecificDates(dates)).await;
        let mut disabled = insert_reminder(&test.ctx, 8, 0, ScheduleConfig::Daily).await;
        disabled.enabled = false;
        test.ctx.repos.reminders.save(&disabled).await.unwrap();
        let mut corrupt = insert_reminder(&test.ctx, 8, 0, ScheduleConfig::Daily).await;
        corrupt.schedule_config = Some("{broken".into());
        test.ctx.repos.reminders.save(&corrupt).await.unwrap();

        let report = rearm_all_controller(&test.ctx).await.unwrap();
        assert_eq!(report.scheduled, vec![daily.id]);
        assert_eq!(report.exhausted, vec![exhausted.id]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].reminder_id, corrupt.id);
        assert_eq!(test.timer.armed_count(), 1);

        // Running it again changes nothing
        let again = rearm_all_controller(&test.ctx).await.unwrap();
        assert_eq!(again, report);
        assert_eq!(test.timer.armed_count(), 1);
    }

    #[tokio::test]
    async fn missing_permission_fails_every_reminder() {
        let test = setup(millis(2024, 1, 10, 9, 0));
        test.timer.set_exact_permission(false);
        insert_reminder(&test.ctx, 8, 0, ScheduleConfig::Daily).await;
        insert_reminder(&test.ctx, 9, 0, ScheduleConfig::Daily).await;

        let report = rearm_all_controller(&test.ctx).await.unwrap();
        assert!(report.scheduled.is_empty());
        assert_eq!(report.failed.len(), 2);
        assert_eq!(test.timer.armed_count(), 0);
    }
}
