use chrono::NaiveDate;
use dose_scheduler_domain::{Reminder, ScheduleConfig, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReminderDTO {
    pub id: ID,
    pub subject_id: ID,
    pub hour: u32,
    pub minute: u32,
    /// `None` when the stored schedule could not be resolved
    pub schedule: Option<ScheduleConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub enabled: bool,
    pub created: i64,
    pub updated: i64,
}

impl ReminderDTO {
    pub fn new(reminder: Reminder) -> Self {
        let schedule = reminder.schedule().ok().map(|resolved| resolved.config);
        Self {
            id: reminder.id,
            subject_id: reminder.subject_id,
            hour: reminder.time_of_day.hour(),
            minute: reminder.time_of_day.minute(),
            description: schedule.as_ref().map(|schedule| schedule.to_string()),
            schedule,
            start_date: reminder.start_date,
            end_date: reminder.end_date,
            enabled: reminder.enabled,
            created: reminder.created,
            updated: reminder.updated,
        }
    }
}
