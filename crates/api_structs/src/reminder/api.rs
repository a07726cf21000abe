use crate::dtos::{AlarmDTO, ReminderDTO};
use chrono::NaiveDate;
use dose_scheduler_domain::{Alarm, Reminder, ScheduleConfig, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderResponse {
    pub reminder: ReminderDTO,
}

impl ReminderResponse {
    pub fn new(reminder: Reminder) -> Self {
        Self {
            reminder: ReminderDTO::new(reminder),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderWithAlarmResponse {
    pub reminder: ReminderDTO,
    pub alarm: Option<AlarmDTO>,
}

impl ReminderWithAlarmResponse {
    pub fn new(reminder: Reminder, alarm: Option<Alarm>) -> Self {
        Self {
            reminder: ReminderDTO::new(reminder),
            alarm: alarm.map(AlarmDTO::new),
        }
    }
}

pub mod create_reminder {
    use super::*;

    #[derive(Debug, Serialize, Deserialize, Clone)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub subject_id: ID,
        pub hour: u32,
        pub minute: u32,
        pub schedule: ScheduleConfig,
        #[serde(default)]
        pub start_date: Option<NaiveDate>,
        #[serde(default)]
        pub end_date: Option<NaiveDate>,
    }

    pub type APIResponse = ReminderWithAlarmResponse;
}

pub mod get_reminder {
    use super::*;

    #[derive(Debug, Deserialize)]
    pub struct PathParams {
        pub reminder_id: ID,
    }

    pub type APIResponse = ReminderWithAlarmResponse;
}

pub mod get_next_occurrence {
    use super::*;

    #[derive(Debug, Deserialize)]
    pub struct PathParams {
        pub reminder_id: ID,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct QueryParams {
        /// Timestamp in millis to compute from. Defaults to now.
        pub reference: Option<i64>,
    }

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        /// Timestamp in millis, `None` when the schedule is exhausted
        pub next_occurrence: Option<i64>,
    }
}

pub mod update_reminder {
    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize, Clone)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        #[serde(default)]
        pub subject_id: Option<ID>,
        #[serde(default)]
        pub hour: Option<u32>,
        #[serde(default)]
        pub minute: Option<u32>,
        #[serde(default)]
        pub schedule: Option<ScheduleConfig>,
        /// `Some(None)` clears the start date
        #[serde(default, with = "double_option")]
        pub start_date: Option<Option<NaiveDate>>,
        /// `Some(None)` clears the end date
        #[serde(default, with = "double_option")]
        pub end_date: Option<Option<NaiveDate>>,
    }

    pub type APIResponse = ReminderWithAlarmResponse;

    /// Tells a missing field apart from an explicit `null`
    mod double_option {
        use serde::{Deserialize, Deserializer, Serialize, Serializer};

        pub fn serialize<T: Serialize, S: Serializer>(
            value: &Option<Option<T>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(inner) => inner.serialize(serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, T: Deserialize<'de>, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Option<T>>, D::Error> {
            Option::<T>::deserialize(deserializer).map(Some)
        }
    }
}

pub mod delete_reminder {
    use super::*;

    #[derive(Debug, Deserialize)]
    pub struct PathParams {
        pub reminder_id: ID,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod set_reminder_enabled {
    use super::*;

    #[derive(Debug, Serialize, Deserialize, Clone)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub enabled: bool,
    }

    pub type APIResponse = ReminderWithAlarmResponse;
}

pub mod snooze_reminder {
    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize, Clone)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        /// Falls back to the configured snooze duration
        #[serde(default)]
        pub minutes: Option<u32>,
    }

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub reminder_id: ID,
        /// Timestamp in millis of the snooze timer
        pub fire_at: i64,
    }
}
