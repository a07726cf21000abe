use chrono::Weekday;
use serde::{ser::SerializeSeq, Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

static ALL_DAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// A set of weekdays stored as a bitmask, Monday being the lowest bit.
///
/// This is the representation used by the deprecated `legacy_days` field
/// of a `Reminder` and by the `Weekly` schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DaySet(u8);

impl DaySet {
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn weekdays() -> Self {
        Self::from_days(&ALL_DAYS[..5])
    }

    pub fn weekend() -> Self {
        Self::from_days(&ALL_DAYS[5..])
    }

    pub fn from_days(days: &[Weekday]) -> Self {
        let mut set = Self::empty();
        for day in days {
            set.insert(*day);
        }
        set
    }

    pub fn insert(&mut self, day: Weekday) {
        self.0 |= Self::bit(day);
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & Self::bit(day) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Days in the set, Monday first
    pub fn iter(&self) -> impl Iterator<Item = Weekday> {
        let set = *self;
        ALL_DAYS.iter().copied().filter(move |d| set.contains(*d))
    }

    fn bit(day: Weekday) -> u8 {
        1 << day.num_days_from_monday()
    }
}

fn str_to_weekday(d: &str) -> Result<Weekday, InvalidDaySetError> {
    match d.trim().to_uppercase().as_str() {
        "MO" => Ok(Weekday::Mon),
        "TU" => Ok(Weekday::Tue),
        "WE" => Ok(Weekday::Wed),
        "TH" => Ok(Weekday::Thu),
        "FR" => Ok(Weekday::Fri),
        "SA" => Ok(Weekday::Sat),
        "SU" => Ok(Weekday::Sun),
        _ => Err(InvalidDaySetError::InvalidWeekdayIdentifier(d.to_string())),
    }
}

pub fn weekday_to_str(wday: Weekday) -> &'static str {
    match wday {
        Weekday::Mon => "MO",
        Weekday::Tue => "TU",
        Weekday::Wed => "WE",
        Weekday::Thu => "TH",
        Weekday::Fri => "FR",
        Weekday::Sat => "SA",
        Weekday::Sun => "SU",
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum InvalidDaySetError {
    #[error("Invalid weekday specified: {0}")]
    InvalidWeekdayIdentifier(String),
}

impl Display for DaySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let codes = self.iter().map(weekday_to_str).collect::<Vec<_>>();
        write!(f, "{}", codes.join(","))
    }
}

/// Parses the legacy comma separated form, e.g. `MO,WE,FR`.
/// An empty string is the empty set.
impl FromStr for DaySet {
    type Err = InvalidDaySetError;

    fn from_str(days: &str) -> Result<Self, Self::Err> {
        let mut set = Self::empty();
        for code in days.split(',').filter(|c| !c.trim().is_empty()) {
            set.insert(str_to_weekday(code)?);
        }
        Ok(set)
    }
}

impl Serialize for DaySet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for day in self.iter() {
            seq.serialize_element(weekday_to_str(day))?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for DaySet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let codes = Vec::<String>::deserialize(deserializer)?;
        let mut set = Self::empty();
        for code in codes {
            let day = str_to_weekday(&code).map_err(serde::de::Error::custom)?;
            set.insert(day);
        }
        Ok(set)
    }
}
