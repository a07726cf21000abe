use crate::{
    recurrence::Recurrence,
    schedule::{ScheduleConfig, ScheduleError, ScheduleType, Weekly},
    shared::{
        day_set::DaySet,
        entity::{Entity, ID},
    },
    time_of_day::TimeOfDay,
};
use chrono::{NaiveDate, NaiveDateTime};

/// A `Reminder` tells the owner to take a dose of the subject
/// (usually a medicine) at the occurrences of its schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    pub id: ID,
    /// What this reminder is for. Opaque to the scheduler.
    pub subject_id: ID,
    pub time_of_day: TimeOfDay,
    /// Discriminator of `schedule_config`. The config wins when the two disagree.
    pub schedule_type: ScheduleType,
    /// Serialized `ScheduleConfig`
    pub schedule_config: Option<String>,
    /// Inclusive
    pub start_date: Option<NaiveDate>,
    /// Inclusive
    pub end_date: Option<NaiveDate>,
    pub enabled: bool,
    /// Deprecated weekday set from before `schedule_config` existed.
    /// Only read when `schedule_config` is missing or unreadable.
    pub legacy_days: DaySet,
    pub created: i64,
    pub updated: i64,
}

/// Where the schedule of a `Reminder` was resolved from
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleSource {
    Config,
    /// No config stored, the schedule type alone describes the schedule
    ScheduleType,
    /// The config was missing or unreadable and the legacy weekdays were used.
    /// Contains the parse error if the config was unreadable.
    LegacyDays(Option<ScheduleError>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSchedule {
    pub config: ScheduleConfig,
    pub source: ScheduleSource,
}

impl Reminder {
    pub fn new(
        subject_id: ID,
        time_of_day: TimeOfDay,
        schedule: &ScheduleConfig,
        now: i64,
    ) -> Result<Self, ScheduleError> {
        Ok(Self {
            id: Default::default(),
            subject_id,
            time_of_day,
            schedule_type: schedule.schedule_type(),
            schedule_config: Some(schedule.to_blob()?),
            start_date: None,
            end_date: None,
            enabled: true,
            legacy_days: DaySet::empty(),
            created: now,
            updated: now,
        })
    }

    pub fn set_schedule(&mut self, schedule: &ScheduleConfig, now: i64) -> Result<(), ScheduleError> {
        self.schedule_config = Some(schedule.to_blob()?);
        self.schedule_type = schedule.schedule_type();
        self.touch(now);
        Ok(())
    }

    pub fn touch(&mut self, now: i64) {
        self.updated = now;
    }

    fn stored_config(&self) -> Option<&str> {
        self.schedule_config
            .as_deref()
            .map(str::trim)
            .filter(|blob| !blob.is_empty())
    }

    /// The record predates `schedule_config` and has only legacy weekdays
    pub fn needs_migration(&self) -> bool {
        self.stored_config().is_none() && !self.legacy_days.is_empty()
    }

    /// Resolves the schedule this reminder follows.
    ///
    /// A readable `schedule_config` always wins. Otherwise the legacy
    /// weekdays are used as a `Weekly` schedule, so a reminder is never
    /// dropped because of a corrupt config.
    pub fn schedule(&self) -> Result<ResolvedSchedule, ScheduleError> {
        let parse_error = match self.stored_config() {
            Some(blob) => match ScheduleConfig::from_blob(blob) {
                Ok(config) => {
                    return Ok(ResolvedSchedule {
                        config,
                        source: ScheduleSource::Config,
                    })
                }
                Err(e) => Some(e),
            },
            None => None,
        };

        if !self.legacy_days.is_empty() {
            let weekly = Weekly::from_day_set(self.legacy_days)?;
            return Ok(ResolvedSchedule {
                config: ScheduleConfig::Weekly(weekly),
                source: ScheduleSource::LegacyDays(parse_error),
            });
        }

        if let Some(e) = parse_error {
            return Err(e);
        }

        self.schedule_type
            .to_dataless_schedule()
            .map(|config| ResolvedSchedule {
                config,
                source: ScheduleSource::ScheduleType,
            })
            .ok_or_else(|| {
                ScheduleError::InvalidSchedule(format!(
                    "Reminder has no stored config for schedule type {}",
                    self.schedule_type
                ))
            })
    }

    pub fn recurrence(&self) -> Result<Recurrence, ScheduleError> {
        let schedule = self.schedule()?;
        Ok(Recurrence {
            schedule: schedule.config,
            time_of_day: self.time_of_day,
            start_date: self.start_date,
            end_date: self.end_date,
        })
    }

    /// Local wall clock time of the next occurrence strictly after `reference`.
    /// `Ok(None)` means the schedule is exhausted.
    pub fn next_occurrence(
        &self,
        reference: NaiveDateTime,
    ) -> Result<Option<NaiveDateTime>, ScheduleError> {
        Ok(self.recurrence()?.next_occurrence(reference))
    }
}

impl Entity for Reminder {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::Weekday;

    fn datetime(y: i32, m: u32, d: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn legacy_reminder(days: DaySet) -> Reminder {
        let mut reminder = Reminder::new(
            ID::new(),
            TimeOfDay::new(8, 0).unwrap(),
            &ScheduleConfig::Daily,
            0,
        )
        .unwrap();
        reminder.schedule_config = None;
        reminder.schedule_type = ScheduleType::Weekly;
        reminder.legacy_days = days;
        reminder
    }

    #[test]
    fn new_reminder_is_enabled_and_serialized() {
        let reminder = Reminder::new(
            ID::new(),
            TimeOfDay::new(8, 0).unwrap(),
            &ScheduleConfig::WeekdayOnly,
            1000,
        )
        .unwrap();
        assert!(reminder.enabled);
        assert_eq!(reminder.schedule_type, ScheduleType::WeekdayOnly);
        assert_eq!(reminder.created, 1000);
        assert_eq!(reminder.updated, 1000);
        assert_eq!(
            reminder.schedule().unwrap(),
            ResolvedSchedule {
                config: ScheduleConfig::WeekdayOnly,
                source: ScheduleSource::Config
            }
        );
        assert!(!reminder.needs_migration());
    }

    #[test]
    fn set_schedule_reserializes_and_bumps_updated() {
        let mut reminder = Reminder::new(
            ID::new(),
            TimeOfDay::new(8, 0).unwrap(),
            &ScheduleConfig::Daily,
            1000,
        )
        .unwrap();
        reminder
            .set_schedule(&ScheduleConfig::WeekendOnly, 2000)
            .unwrap();
        assert_eq!(reminder.updated, 2000);
        assert_eq!(reminder.created, 1000);
        assert_eq!(reminder.schedule_type, ScheduleType::WeekendOnly);
        assert_eq!(
            reminder.schedule().unwrap().config,
            ScheduleConfig::WeekendOnly
        );
    }

    #[test]
    fn legacy_days_behave_like_weekly() {
        let days = DaySet::from_days(&[Weekday::Tue, Weekday::Thu]);
        let legacy = legacy_reminder(days);
        assert!(legacy.needs_migration());

        let mut modern = legacy.clone();
        modern
            .set_schedule(
                &ScheduleConfig::Weekly(Weekly::from_day_set(days).unwrap()),
                0,
            )
            .unwrap();

        // 2024-01-01 is a Monday
        let mut reference = datetime(2024, 1, 1, 0, 0);
        for _ in 0..10 {
            let expected = modern.next_occurrence(reference).unwrap();
            assert_eq!(legacy.next_occurrence(reference).unwrap(), expected);
            reference = expected.unwrap();
        }
        assert_eq!(
            legacy.next_occurrence(datetime(2024, 1, 1, 0, 0)).unwrap(),
            Some(datetime(2024, 1, 2, 8, 0))
        );
    }

    #[test]
    fn corrupt_config_falls_back_to_legacy_days() {
        let mut reminder = legacy_reminder(DaySet::from_days(&[Weekday::Fri]));
        reminder.schedule_config = Some("{broken".into());
        let schedule = reminder.schedule().unwrap();
        assert_eq!(schedule.config.day_set(), Some(DaySet::from_days(&[Weekday::Fri])));
        match schedule.source {
            ScheduleSource::LegacyDays(Some(ScheduleError::ScheduleParseError(_))) => (),
            other => panic!("Unexpected source: {:?}", other),
        }
        // Corrupt configs are not migrated away, only missing ones
        assert!(!reminder.needs_migration());
    }

    #[test]
    fn config_wins_over_legacy_days() {
        let mut reminder = legacy_reminder(DaySet::from_days(&[Weekday::Fri]));
        reminder
            .set_schedule(&ScheduleConfig::Daily, 0)
            .unwrap();
        assert_eq!(reminder.schedule().unwrap().config, ScheduleConfig::Daily);
    }

    #[test]
    fn corrupt_config_without_fallback_is_an_error() {
        let mut reminder = legacy_reminder(DaySet::empty());
        reminder.schedule_config = Some("{broken".into());
        match reminder.schedule() {
            Err(ScheduleError::ScheduleParseError(_)) => (),
            other => panic!("Expected parse error, got: {:?}", other),
        }
    }

    #[test]
    fn missing_config_resolves_from_dataless_type() {
        let mut reminder = legacy_reminder(DaySet::empty());
        reminder.schedule_type = ScheduleType::Daily;
        assert_eq!(
            reminder.schedule().unwrap(),
            ResolvedSchedule {
                config: ScheduleConfig::Daily,
                source: ScheduleSource::ScheduleType
            }
        );
        reminder.schedule_type = ScheduleType::Monthly;
        assert!(reminder.schedule().is_err());
    }
}
