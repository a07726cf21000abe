use super::scheduler::{self, AlarmError};
use crate::shared::usecase::UseCase;
use dose_scheduler_domain::{Alarm, AlarmKind, AlarmState};
use dose_scheduler_infra::{DoseContext, FiredTimer};
use tracing::info;

/// A timer of the platform went off
#[derive(Debug)]
pub struct OnFiredUseCase {
    pub fired: FiredTimer,
}

#[derive(Debug)]
pub enum UseCaseError {
    Alarm(AlarmError),
}

#[async_trait::async_trait]
impl UseCase for OnFiredUseCase {
    /// The alarm armed for the following occurrence
    type Response = Option<Alarm>;

    type Error = UseCaseError;

    const NAME: &'static str = "OnFired";

    async fn execute(&mut self, ctx: &DoseContext) -> Result<Self::Response, Self::Error> {
        let payload = &self.fired.payload;
        let _guard = ctx.locks.lock(&payload.reminder_id).await;
        let reminder = match ctx.repos.reminders.find(&payload.reminder_id).await {
            Some(reminder) => reminder,
            None => {
                info!(
                    "Timer {} fired for deleted reminder {}",
                    self.fired.key, payload.reminder_id
                );
                ctx.timer
                    .cancel(self.fired.key)
                    .await
                    .map_err(|e| UseCaseError::Alarm(AlarmError::Timer(e)))?;
                if payload.kind == AlarmKind::Dose {
                    ctx.repos.alarms.delete(&payload.reminder_id).await;
                }
                return Ok(None);
            }
        };

        // A timer can already be queued when its reminder is disabled or rearmed
        if !reminder.enabled {
            info!(
                "Timer {} fired for disabled reminder {}, ignoring it",
                self.fired.key, reminder.id
            );
            return Ok(None);
        }

        if payload.kind == AlarmKind::Snooze {
            info!(
                "Snoozed dose of subject {} is due for reminder {}",
                reminder.subject_id, reminder.id
            );
            return Ok(None);
        }

        let is_current = match ctx.repos.alarms.find(&reminder.id).await {
            Some(alarm) => {
                alarm.state == AlarmState::Scheduled
                    && alarm.key == self.fired.key
                    && alarm.fire_at == Some(payload.fire_at)
            }
            None => false,
        };
        if !is_current {
            info!(
                "Timer {} of reminder {} for {} is no longer armed, ignoring it",
                self.fired.key, reminder.id, payload.fire_at
            );
            return Ok(None);
        }

        info!(
            "Dose of subject {} is due for reminder {}",
            reminder.subject_id, reminder.id
        );
        scheduler::mark_fired(&reminder.id, ctx).await;

        // The platform may fire slightly early, never re-arm the same occurrence
        let reference = std::cmp::max(ctx.sys.get_timestamp_millis(), payload.fire_at);
        scheduler::arm(&reminder, reference, ctx)
            .await
            .map(Some)
            .map_err(UseCaseError::Alarm)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::{test_helpers::*, usecase::execute};
    use dose_scheduler_domain::ScheduleConfig;

    #[tokio::test]
    async fn fired_timer_arms_next_occurrence() {
        let test = setup(millis(2024, 1, 1, 7, 0));
        let reminder = insert_reminder(&test.ctx, 8, 0, ScheduleConfig::Daily).await;
        let alarm = scheduler::rearm(&reminder, &test.ctx).await.unwrap();
        assert_eq!(alarm.fire_at, Some(millis(2024, 1, 1, 8, 0)));

        test.sys.set(millis(2024, 1, 1, 8, 0));
        let fired = test.timer.fire(alarm.key).unwrap();
        let alarm = execute(OnFiredUseCase { fired }, &test.ctx)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(alarm.state, AlarmState::Scheduled);
        assert_eq!(alarm.fire_at, Some(millis(2024, 1, 2, 8, 0)));
        assert_eq!(test.timer.armed_count(), 1);
    }

    #[tokio::test]
    async fn early_fire_does_not_repeat_occurrence() {
        let test = setup(millis(2024, 1, 1, 7, 0));
        let reminder = insert_reminder(&test.ctx, 8, 0, ScheduleConfig::Daily).await;
        let alarm = scheduler::rearm(&reminder, &test.ctx).await.unwrap();

        test.sys.set(millis(2024, 1, 1, 7, 59));
        let fired = test.timer.fire(alarm.key).unwrap();
        let alarm = execute(OnFiredUseCase { fired }, &test.ctx)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(alarm.fire_at, Some(millis(2024, 1, 2, 8, 0)));
    }

    #[tokio::test]
    async fn fired_timer_of_deleted_reminder_is_dropped() {
        let test = setup(millis(2024, 1, 1, 7, 0));
        let reminder = insert_reminder(&test.ctx, 8, 0, ScheduleConfig::Daily).await;
        let alarm = scheduler::rearm(&reminder, &test.ctx).await.unwrap();
        test.ctx.repos.reminders.delete(&reminder.id).await.unwrap();

        let fired = test.timer.fire(alarm.key).unwrap();
        let res = execute(OnFiredUseCase { fired }, &test.ctx).await.unwrap();
        assert!(res.is_none());
        assert_eq!(test.timer.armed_count(), 0);
        assert!(test.ctx.repos.alarms.find(&reminder.id).await.is_none());
    }

    #[tokio::test]
    async fn fired_snooze_does_not_rearm() {
        let test = setup(millis(2024, 1, 1, 9, 0));
        let reminder = insert_reminder(&test.ctx, 8, 0, ScheduleConfig::Daily).await;
        scheduler::snooze(&reminder, 10, &test.ctx).await.unwrap();
        let snooze_key = dose_scheduler_domain::request_code::action_request_code(
            &reminder.id,
            dose_scheduler_domain::request_code::SNOOZE_ACTION,
        );

        test.sys.set(millis(2024, 1, 1, 9, 10));
        let fired = test.timer.fire(snooze_key).unwrap();
        let res = execute(OnFiredUseCase { fired }, &test.ctx).await.unwrap();
        assert!(res.is_none());
        assert_eq!(test.timer.armed_count(), 0);
    }

    #[tokio::test]
    async fn queued_timer_of_disabled_reminder_is_ignored() {
        let test = setup(millis(2024, 1, 1, 7, 0));
        let mut reminder = insert_reminder(&test.ctx, 8, 0, ScheduleConfig::Daily).await;
        let alarm = scheduler::rearm(&reminder, &test.ctx).await.unwrap();
        let fired = test.timer.fire(alarm.key).unwrap();

        reminder.enabled = false;
        test.ctx.repos.reminders.save(&reminder).await.unwrap();
        scheduler::cancel(&reminder.id, &test.ctx).await.unwrap();

        test.sys.set(millis(2024, 1, 1, 8, 0));
        let res = execute(OnFiredUseCase { fired }, &test.ctx).await.unwrap();
        assert!(res.is_none());
        let alarm = test.ctx.repos.alarms.find(&reminder.id).await.unwrap();
        assert_eq!(alarm.state, AlarmState::Cancelled);
        assert_eq!(test.timer.armed_count(), 0);
    }

    #[tokio::test]
    async fn queued_timer_of_rearmed_reminder_is_ignored() {
        let test = setup(millis(2024, 1, 1, 7, 0));
        let mut reminder = insert_reminder(&test.ctx, 8, 0, ScheduleConfig::Daily).await;
        let alarm = scheduler::rearm(&reminder, &test.ctx).await.unwrap();
        let fired = test.timer.fire(alarm.key).unwrap();

        reminder.time_of_day = dose_scheduler_domain::TimeOfDay::new(9, 30).unwrap();
        test.ctx.repos.reminders.save(&reminder).await.unwrap();
        scheduler::rearm(&reminder, &test.ctx).await.unwrap();

        test.sys.set(millis(2024, 1, 1, 8, 0));
        let res = execute(OnFiredUseCase { fired }, &test.ctx).await.unwrap();
        assert!(res.is_none());
        let alarm = test.ctx.repos.alarms.find(&reminder.id).await.unwrap();
        assert_eq!(alarm.state, AlarmState::Scheduled);
        assert_eq!(alarm.fire_at, Some(millis(2024, 1, 1, 9, 30)));
        assert_eq!(test.timer.armed(alarm.key).unwrap().0, millis(2024, 1, 1, 9, 30));
    }

    #[tokio::test]
    async fn fired_snooze_of_disabled_reminder_is_ignored() {
        let test = setup(millis(2024, 1, 1, 9, 0));
        let mut reminder = insert_reminder(&test.ctx, 8, 0, ScheduleConfig::Daily).await;
        scheduler::snooze(&reminder, 10, &test.ctx).await.unwrap();
        let snooze_key = dose_scheduler_domain::request_code::action_request_code(
            &reminder.id,
            dose_scheduler_domain::request_code::SNOOZE_ACTION,
        );
        let fired = test.timer.fire(snooze_key).unwrap();
        reminder.enabled = false;
        test.ctx.repos.reminders.save(&reminder).await.unwrap();

        let res = execute(OnFiredUseCase { fired }, &test.ctx).await.unwrap();
        assert!(res.is_none());
        assert!(test.ctx.repos.alarms.find(&reminder.id).await.is_none());
    }
}
