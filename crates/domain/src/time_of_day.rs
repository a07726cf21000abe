use crate::validation::ValidationError;
use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt::Display};

/// Wall clock time at which a `Reminder` goes off, with minute precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTimeOfDay", into = "RawTimeOfDay")]
pub struct TimeOfDay(NaiveTime);

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawTimeOfDay {
    hour: u32,
    minute: u32,
}

impl TimeOfDay {
    pub fn new(hour: u32, minute: u32) -> Result<Self, ValidationError> {
        if hour > 23 {
            return Err(ValidationError::InvalidHour(hour));
        }
        NaiveTime::from_hms_opt(hour, minute, 0)
            .map(Self)
            .ok_or(ValidationError::InvalidMinute(minute))
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    pub fn naive_time(&self) -> NaiveTime {
        self.0
    }
}

impl TryFrom<RawTimeOfDay> for TimeOfDay {
    type Error = ValidationError;

    fn try_from(raw: RawTimeOfDay) -> Result<Self, Self::Error> {
        Self::new(raw.hour, raw.minute)
    }
}

impl From<TimeOfDay> for RawTimeOfDay {
    fn from(time: TimeOfDay) -> Self {
        Self {
            hour: time.hour(),
            minute: time.minute(),
        }
    }
}

impl Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}
