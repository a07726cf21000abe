use crate::{schedule::ScheduleError, Reminder};
use chrono::NaiveDate;
use thiserror::Error;

/// Longest snooze accepted from a caller, in minutes
pub const MAX_SNOOZE_MINUTES: u32 = 12 * 60;

#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Hour must be between 0 and 23, got: {0}")]
    InvalidHour(u32),
    #[error("Minute must be between 0 and 59, got: {0}")]
    InvalidMinute(u32),
    #[error("Start date {start} is after end date {end}")]
    StartAfterEnd { start: NaiveDate, end: NaiveDate },
    #[error("Snooze must be between 1 and 720 minutes, got: {0}")]
    InvalidSnooze(u32),
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

pub fn validate_date_range(
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Result<(), ValidationError> {
    match (start_date, end_date) {
        (Some(start), Some(end)) if start > end => {
            Err(ValidationError::StartAfterEnd { start, end })
        }
        _ => Ok(()),
    }
}

pub fn validate_snooze_minutes(minutes: u32) -> Result<u32, ValidationError> {
    if minutes == 0 || minutes > MAX_SNOOZE_MINUTES {
        return Err(ValidationError::InvalidSnooze(minutes));
    }
    Ok(minutes)
}

/// Checks everything about a `Reminder` that the scheduler relies on:
/// a sane date range and a schedule that can be resolved.
pub fn validate_reminder(reminder: &Reminder) -> Result<(), ValidationError> {
    validate_date_range(reminder.start_date, reminder.end_date)?;
    reminder.schedule()?;
    Ok(())
}
