use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};

/// Lifecycle of the platform timer belonging to a `Reminder`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AlarmState {
    /// No timer, e.g. because the reminder is disabled or permission is missing
    Unscheduled,
    /// Exactly one timer is armed at `Alarm::fire_at`
    Scheduled,
    /// The timer went off and the next occurrence has not been armed yet
    Fired,
    /// Terminal: the reminder was disabled, deleted or its schedule is exhausted
    Cancelled,
}

/// The scheduler's record of the timer armed for a `Reminder`
#[derive(Debug, Clone, PartialEq)]
pub struct Alarm {
    pub reminder_id: ID,
    pub state: AlarmState,
    /// Platform timer key, see `request_code`
    pub key: i64,
    /// Timestamp in millis the timer is armed for, while `Scheduled`
    pub fire_at: Option<i64>,
    pub updated: i64,
}

impl Alarm {
    pub fn new(reminder_id: ID, key: i64, now: i64) -> Self {
        Self {
            reminder_id,
            state: AlarmState::Unscheduled,
            key,
            fire_at: None,
            updated: now,
        }
    }

    pub fn set_state(&mut self, state: AlarmState, fire_at: Option<i64>, now: i64) {
        self.state = state;
        self.fire_at = fire_at;
        self.updated = now;
    }
}

impl Entity for Alarm {
    fn id(&self) -> &ID {
        &self.reminder_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AlarmKind {
    /// The regular occurrence of the schedule
    Dose,
    /// A one-shot timer requested by the user after a dose alarm
    Snooze,
}

/// Data handed to the platform timer and returned when it fires
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlarmPayload {
    pub reminder_id: ID,
    pub subject_id: ID,
    pub kind: AlarmKind,
    pub fire_at: i64,
}
