use dose_scheduler_domain::{Alarm, AlarmState, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AlarmDTO {
    pub reminder_id: ID,
    pub state: AlarmState,
    pub key: i64,
    pub fire_at: Option<i64>,
}

impl AlarmDTO {
    pub fn new(alarm: Alarm) -> Self {
        Self {
            reminder_id: alarm.reminder_id,
            state: alarm.state,
            key: alarm.key,
            fire_at: alarm.fire_at,
        }
    }
}

/// A reminder that a batch operation could not process
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureDTO {
    pub reminder_id: ID,
    pub reason: String,
}
