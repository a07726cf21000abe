use crate::{shared::day_set::DaySet, time_of_day::TimeOfDay};
use chrono::NaiveDate;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, convert::TryFrom, fmt::Display, str::FromStr};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScheduleError {
    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),
    #[error("Unable to parse schedule config: {0}")]
    ScheduleParseError(String),
}

/// The recurrence rule of a `Reminder`.
///
/// Serialized as `{"type": <discriminator>, "value": <payload>}` and stored
/// as an opaque blob next to the reminder record. The payload types can
/// only be constructed through their validating constructors, so a
/// `ScheduleConfig` that exists is always consistent with its tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum ScheduleConfig {
    Daily,
    Weekly(Weekly),
    IntervalDays(IntervalDays),
    IntervalHours(IntervalHours),
    SpecificDates(SpecificDates),
    Monthly(Monthly),
    WeekdayOnly,
    WeekendOnly,
    /// Reserved for future rule kinds. Never produces an occurrence.
    Custom(serde_json::Value),
}

impl ScheduleConfig {
    pub fn to_blob(&self) -> Result<String, ScheduleError> {
        serde_json::to_string(self).map_err(|e| ScheduleError::InvalidSchedule(e.to_string()))
    }

    pub fn from_blob(blob: &str) -> Result<Self, ScheduleError> {
        serde_json::from_str(blob).map_err(|e| ScheduleError::ScheduleParseError(e.to_string()))
    }

    pub fn schedule_type(&self) -> ScheduleType {
        match self {
            Self::Daily => ScheduleType::Daily,
            Self::Weekly(_) => ScheduleType::Weekly,
            Self::IntervalDays(_) => ScheduleType::IntervalDays,
            Self::IntervalHours(_) => ScheduleType::IntervalHours,
            Self::SpecificDates(_) => ScheduleType::SpecificDates,
            Self::Monthly(_) => ScheduleType::Monthly,
            Self::WeekdayOnly => ScheduleType::WeekdayOnly,
            Self::WeekendOnly => ScheduleType::WeekendOnly,
            Self::Custom(_) => ScheduleType::Custom,
        }
    }

    /// The weekdays this schedule fires on, for the variants that are
    /// defined by a set of weekdays
    pub fn day_set(&self) -> Option<DaySet> {
        match self {
            Self::Weekly(weekly) => Some(weekly.to_day_set()),
            Self::WeekdayOnly => Some(DaySet::weekdays()),
            Self::WeekendOnly => Some(DaySet::weekend()),
            _ => None,
        }
    }
}

impl Display for ScheduleConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Daily => write!(f, "Every day"),
            Self::Weekly(weekly) => write!(f, "Weekly on {}", weekly.days.iter().join(", ")),
            Self::IntervalDays(rule) if rule.interval == 1 => {
                write!(f, "Every day from {}", rule.anchor)
            }
            Self::IntervalDays(rule) => {
                write!(f, "Every {} days from {}", rule.interval, rule.anchor)
            }
            Self::IntervalHours(rule) if rule.interval == 1 => {
                write!(f, "Every hour from {}", rule.anchor)
            }
            Self::IntervalHours(rule) => {
                write!(f, "Every {} hours from {}", rule.interval, rule.anchor)
            }
            Self::SpecificDates(dates) if dates.dates.len() == 1 => {
                write!(f, "Once on {}", dates.dates.iter().join(""))
            }
            Self::SpecificDates(dates) => write!(f, "On {} specific dates", dates.dates.len()),
            Self::Monthly(monthly) => write!(f, "Monthly on day {}", monthly.days.iter().join(", ")),
            Self::WeekdayOnly => write!(f, "Weekdays"),
            Self::WeekendOnly => write!(f, "Weekends"),
            Self::Custom(_) => write!(f, "Custom schedule"),
        }
    }
}

/// Discriminator column persisted next to the serialized `ScheduleConfig`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduleType {
    Daily,
    Weekly,
    IntervalDays,
    IntervalHours,
    SpecificDates,
    Monthly,
    WeekdayOnly,
    WeekendOnly,
    Custom,
}

impl ScheduleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::IntervalDays => "INTERVAL_DAYS",
            Self::IntervalHours => "INTERVAL_HOURS",
            Self::SpecificDates => "SPECIFIC_DATES",
            Self::Monthly => "MONTHLY",
            Self::WeekdayOnly => "WEEKDAY_ONLY",
            Self::WeekendOnly => "WEEKEND_ONLY",
            Self::Custom => "CUSTOM",
        }
    }

    /// Schedules which are fully described by their type and need no payload
    pub fn to_dataless_schedule(self) -> Option<ScheduleConfig> {
        match self {
            Self::Daily => Some(ScheduleConfig::Daily),
            Self::WeekdayOnly => Some(ScheduleConfig::WeekdayOnly),
            Self::WeekendOnly => Some(ScheduleConfig::WeekendOnly),
            _ => None,
        }
    }
}

impl Default for ScheduleType {
    fn default() -> Self {
        Self::Daily
    }
}

impl Display for ScheduleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ScheduleType {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let schedule_type = match s.to_uppercase().as_str() {
            "DAILY" => Self::Daily,
            "WEEKLY" => Self::Weekly,
            "INTERVAL_DAYS" => Self::IntervalDays,
            "INTERVAL_HOURS" => Self::IntervalHours,
            "SPECIFIC_DATES" => Self::SpecificDates,
            "MONTHLY" => Self::Monthly,
            "WEEKDAY_ONLY" => Self::WeekdayOnly,
            "WEEKEND_ONLY" => Self::WeekendOnly,
            "CUSTOM" => Self::Custom,
            _ => {
                return Err(ScheduleError::ScheduleParseError(format!(
                    "Unknown schedule type: {}",
                    s
                )))
            }
        };
        Ok(schedule_type)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DaySet", into = "DaySet")]
pub struct Weekly {
    days: DaySet,
}

impl Weekly {
    /// The only way to turn a legacy weekday set into a schedule
    pub fn from_day_set(days: DaySet) -> Result<Self, ScheduleError> {
        if days.is_empty() {
            return Err(ScheduleError::InvalidSchedule(
                "A weekly schedule needs at least one weekday".into(),
            ));
        }
        Ok(Self { days })
    }

    pub fn to_day_set(&self) -> DaySet {
        self.days
    }
}

impl TryFrom<DaySet> for Weekly {
    type Error = ScheduleError;

    fn try_from(days: DaySet) -> Result<Self, Self::Error> {
        Self::from_day_set(days)
    }
}

impl From<Weekly> for DaySet {
    fn from(weekly: Weekly) -> Self {
        weekly.days
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawIntervalDays", into = "RawIntervalDays")]
pub struct IntervalDays {
    interval: u32,
    anchor: NaiveDate,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawIntervalDays {
    interval: u32,
    anchor: NaiveDate,
}

impl IntervalDays {
    pub fn new(interval: u32, anchor: NaiveDate) -> Result<Self, ScheduleError> {
        if interval == 0 {
            return Err(ScheduleError::InvalidSchedule(
                "Day interval must be at least 1".into(),
            ));
        }
        Ok(Self { interval, anchor })
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }
}

impl TryFrom<RawIntervalDays> for IntervalDays {
    type Error = ScheduleError;

    fn try_from(raw: RawIntervalDays) -> Result<Self, Self::Error> {
        Self::new(raw.interval, raw.anchor)
    }
}

impl From<IntervalDays> for RawIntervalDays {
    fn from(rule: IntervalDays) -> Self {
        Self {
            interval: rule.interval,
            anchor: rule.anchor,
        }
    }
}

/// Every `interval` hours counted from `anchor`, which is a time of day
/// reused as the start of every day. The reminder's own time of day is
/// not used by this rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawIntervalHours", into = "RawIntervalHours")]
pub struct IntervalHours {
    interval: u32,
    anchor: TimeOfDay,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawIntervalHours {
    interval: u32,
    anchor: TimeOfDay,
}

impl IntervalHours {
    pub fn new(interval: u32, anchor: TimeOfDay) -> Result<Self, ScheduleError> {
        if interval == 0 {
            return Err(ScheduleError::InvalidSchedule(
                "Hour interval must be at least 1".into(),
            ));
        }
        Ok(Self { interval, anchor })
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    pub fn anchor(&self) -> TimeOfDay {
        self.anchor
    }
}

impl TryFrom<RawIntervalHours> for IntervalHours {
    type Error = ScheduleError;

    fn try_from(raw: RawIntervalHours) -> Result<Self, Self::Error> {
        Self::new(raw.interval, raw.anchor)
    }
}

impl From<IntervalHours> for RawIntervalHours {
    fn from(rule: IntervalHours) -> Self {
        Self {
            interval: rule.interval,
            anchor: rule.anchor,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeSet<NaiveDate>", into = "BTreeSet<NaiveDate>")]
pub struct SpecificDates {
    dates: BTreeSet<NaiveDate>,
}

impl SpecificDates {
    pub fn new<I: IntoIterator<Item = NaiveDate>>(dates: I) -> Result<Self, ScheduleError> {
        let dates = dates.into_iter().collect::<BTreeSet<_>>();
        if dates.is_empty() {
            return Err(ScheduleError::InvalidSchedule(
                "At least one date must be specified".into(),
            ));
        }
        Ok(Self { dates })
    }

    /// Dates in ascending order
    pub fn dates(&self) -> &BTreeSet<NaiveDate> {
        &self.dates
    }
}

impl TryFrom<BTreeSet<NaiveDate>> for SpecificDates {
    type Error = ScheduleError;

    fn try_from(dates: BTreeSet<NaiveDate>) -> Result<Self, Self::Error> {
        Self::new(dates)
    }
}

impl From<SpecificDates> for BTreeSet<NaiveDate> {
    fn from(rule: SpecificDates) -> Self {
        rule.dates
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeSet<u32>", into = "BTreeSet<u32>")]
pub struct Monthly {
    days: BTreeSet<u32>,
}

impl Monthly {
    pub fn new<I: IntoIterator<Item = u32>>(days: I) -> Result<Self, ScheduleError> {
        let days = days.into_iter().collect::<BTreeSet<_>>();
        if days.is_empty() {
            return Err(ScheduleError::InvalidSchedule(
                "At least one day of month must be specified".into(),
            ));
        }
        if let Some(day) = days.iter().find(|d| **d < 1 || **d > 31) {
            return Err(ScheduleError::InvalidSchedule(format!(
                "Day of month must be between 1 and 31, got: {}",
                day
            )));
        }
        Ok(Self { days })
    }

    /// Days of month in ascending order
    pub fn days(&self) -> &BTreeSet<u32> {
        &self.days
    }
}

impl TryFrom<BTreeSet<u32>> for Monthly {
    type Error = ScheduleError;

    fn try_from(days: BTreeSet<u32>) -> Result<Self, Self::Error> {
        Self::new(days)
    }
}

impl From<Monthly> for BTreeSet<u32> {
    fn from(rule: Monthly) -> Self {
        rule.days
    }
}
