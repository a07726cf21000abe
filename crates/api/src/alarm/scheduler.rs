//! Keeps the platform timer of every `Reminder` in line with its schedule.
//!
//! None of these functions take the reminder lock, callers must hold it.

use dose_scheduler_domain::{
    date::{to_local_datetime, to_timestamp_millis},
    request_code::{action_request_code, request_code, SNOOZE_ACTION},
    Alarm, AlarmKind, AlarmPayload, AlarmState, Reminder, ScheduleError, ID,
};
use dose_scheduler_infra::DoseContext;
use thiserror::Error;
use tracing::{info, warn};

/// Times a DST fold can make an occurrence map before the reference
const MAX_FOLD_RETRIES: usize = 3;

#[derive(Error, Debug)]
pub enum AlarmError {
    #[error("Permission to schedule exact alarms is not granted")]
    PermissionDenied,
    #[error("The schedule could not be resolved: {0}")]
    Schedule(#[from] ScheduleError),
    #[error("Timestamp {0} is outside the supported range")]
    InvalidTimestamp(i64),
    #[error("The platform timer failed: {0}")]
    Timer(anyhow::Error),
}

/// Timestamp of the next occurrence strictly after `reference`, computed
/// on the wall clock of the configured timezone
pub fn next_fire_at(
    reminder: &Reminder,
    reference: i64,
    ctx: &DoseContext,
) -> Result<Option<i64>, AlarmError> {
    let tz = &ctx.config.timezone;
    let mut local_reference =
        to_local_datetime(reference, tz).ok_or(AlarmError::InvalidTimestamp(reference))?;

    for _ in 0..MAX_FOLD_RETRIES {
        let local = match reminder.next_occurrence(local_reference)? {
            Some(local) => local,
            None => return Ok(None),
        };
        let fire_at = to_timestamp_millis(&local, tz);
        if fire_at > reference {
            return Ok(Some(fire_at));
        }
        local_reference = local;
    }
    Ok(None)
}

async fn find_alarm(reminder_id: &ID, now: i64, ctx: &DoseContext) -> Alarm {
    ctx.repos
        .alarms
        .find(reminder_id)
        .await
        .unwrap_or_else(|| Alarm::new(*reminder_id, request_code(reminder_id), now))
}

async fn save_state(
    mut alarm: Alarm,
    state: AlarmState,
    fire_at: Option<i64>,
    ctx: &DoseContext,
) -> Alarm {
    alarm.set_state(state, fire_at, ctx.sys.get_timestamp_millis());
    ctx.repos.alarms.save(&alarm).await;
    alarm
}

/// Arms the timer for the next occurrence after `reference`
pub async fn arm(
    reminder: &Reminder,
    reference: i64,
    ctx: &DoseContext,
) -> Result<Alarm, AlarmError> {
    let now = ctx.sys.get_timestamp_millis();
    let alarm = find_alarm(&reminder.id, now, ctx).await;

    if !reminder.enabled {
        return Ok(save_state(alarm, AlarmState::Unscheduled, None, ctx).await);
    }

    if !ctx.timer.can_schedule_exact() {
        warn!(
            "Unable to arm reminder {}: exact alarm permission is missing",
            reminder.id
        );
        save_state(alarm, AlarmState::Unscheduled, None, ctx).await;
        return Err(AlarmError::PermissionDenied);
    }

    let fire_at = match next_fire_at(reminder, reference, ctx) {
        Ok(fire_at) => fire_at,
        Err(e) => {
            save_state(alarm, AlarmState::Unscheduled, None, ctx).await;
            return Err(e);
        }
    };

    match fire_at {
        None => {
            ctx.timer.cancel(alarm.key).await.map_err(AlarmError::Timer)?;
            info!("Schedule of reminder {} is exhausted", reminder.id);
            Ok(save_state(alarm, AlarmState::Cancelled, None, ctx).await)
        }
        Some(fire_at) => {
            let payload = AlarmPayload {
                reminder_id: reminder.id,
                subject_id: reminder.subject_id,
                kind: AlarmKind::Dose,
                fire_at,
            };
            if let Err(e) = ctx.timer.arm_exact(alarm.key, fire_at, payload).await {
                save_state(alarm, AlarmState::Unscheduled, None, ctx).await;
                return Err(AlarmError::Timer(e));
            }
            info!("Armed reminder {} for {}", reminder.id, fire_at);
            Ok(save_state(alarm, AlarmState::Scheduled, Some(fire_at), ctx).await)
        }
    }
}

/// Cancels the dose and snooze timers of the reminder. Safe to call when
/// nothing is armed.
pub async fn cancel(reminder_id: &ID, ctx: &DoseContext) -> Result<Alarm, AlarmError> {
    let now = ctx.sys.get_timestamp_millis();
    let alarm = find_alarm(reminder_id, now, ctx).await;
    ctx.timer.cancel(alarm.key).await.map_err(AlarmError::Timer)?;
    ctx.timer
        .cancel(action_request_code(reminder_id, SNOOZE_ACTION))
        .await
        .map_err(AlarmError::Timer)?;
    Ok(save_state(alarm, AlarmState::Cancelled, None, ctx).await)
}

/// `cancel` followed by `arm` from now
pub async fn rearm(reminder: &Reminder, ctx: &DoseContext) -> Result<Alarm, AlarmError> {
    cancel(&reminder.id, ctx).await?;
    arm(reminder, ctx.sys.get_timestamp_millis(), ctx).await
}

/// Marks the alarm of the reminder as fired
pub async fn mark_fired(reminder_id: &ID, ctx: &DoseContext) -> Alarm {
    let now = ctx.sys.get_timestamp_millis();
    let alarm = find_alarm(reminder_id, now, ctx).await;
    save_state(alarm, AlarmState::Fired, None, ctx).await
}

/// Arms a one-shot timer `minutes` from now in the snooze keyspace of the
/// reminder. The dose alarm is left alone.
pub async fn snooze(
    reminder: &Reminder,
    minutes: u32,
    ctx: &DoseContext,
) -> Result<i64, AlarmError> {
    if !ctx.timer.can_schedule_exact() {
        return Err(AlarmError::PermissionDenied);
    }
    let fire_at = ctx.sys.get_timestamp_millis() + i64::from(minutes) * 60 * 1000;
    let payload = AlarmPayload {
        reminder_id: reminder.id,
        subject_id: reminder.subject_id,
        kind: AlarmKind::Snooze,
        fire_at,
    };
    ctx.timer
        .arm_exact(
            action_request_code(&reminder.id, SNOOZE_ACTION),
            fire_at,
            payload,
        )
        .await
        .map_err(AlarmError::Timer)?;
    info!("Snoozed reminder {} until {}", reminder.id, fire_at);
    Ok(fire_at)
}
