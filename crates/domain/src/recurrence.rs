use crate::{
    date::{first_of_next_month, get_month_length},
    schedule::{IntervalDays, IntervalHours, Monthly, ScheduleConfig, SpecificDates},
    shared::day_set::DaySet,
    time_of_day::TimeOfDay,
};
use chrono::{prelude::*, Duration};

/// Upper bound on how many months a `Monthly` rule is scanned ahead.
/// Any day of month 1-31 occurs at least once within this window.
const MONTHLY_SCAN_LIMIT: usize = 12;

/// Everything needed to compute the occurrences of a `Reminder`.
///
/// All instants are device local wall clock times.
#[derive(Debug, Clone, PartialEq)]
pub struct Recurrence {
    pub schedule: ScheduleConfig,
    pub time_of_day: TimeOfDay,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl Recurrence {
    /// The earliest occurrence strictly after `reference`, or `None` when
    /// the schedule has no further occurrences.
    pub fn next_occurrence(&self, reference: NaiveDateTime) -> Option<NaiveDateTime> {
        if let Some(end) = self.end_date {
            if reference.date() > end {
                return None;
            }
        }

        let reference = match self.start_date {
            // Step back one second so the first occurrence on the start date
            // is itself eligible under the strictly-after rule
            Some(start) if self.at(start) > reference => self.at(start) - Duration::seconds(1),
            _ => reference,
        };

        let candidate = match &self.schedule {
            ScheduleConfig::Daily => Some(self.next_daily(reference)),
            ScheduleConfig::Weekly(weekly) => self.next_weekly(weekly.to_day_set(), reference),
            ScheduleConfig::WeekdayOnly => self.next_weekly(DaySet::weekdays(), reference),
            ScheduleConfig::WeekendOnly => self.next_weekly(DaySet::weekend(), reference),
            ScheduleConfig::IntervalDays(rule) => Some(self.next_interval_days(rule, reference)),
            ScheduleConfig::IntervalHours(rule) => Some(next_interval_hours(rule, reference)),
            ScheduleConfig::SpecificDates(rule) => self.next_specific_date(rule, reference),
            ScheduleConfig::Monthly(rule) => self.next_monthly(rule, reference),
            ScheduleConfig::Custom(_) => None,
        }?;

        match self.end_date {
            Some(end) if candidate.date() > end => None,
            _ => Some(candidate),
        }
    }

    fn at(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.time_of_day.naive_time())
    }

    fn next_daily(&self, reference: NaiveDateTime) -> NaiveDateTime {
        let today = self.at(reference.date());
        if today > reference {
            today
        } else {
            today + Duration::days(1)
        }
    }

    fn next_weekly(&self, days: DaySet, reference: NaiveDateTime) -> Option<NaiveDateTime> {
        let today = reference.date();
        if days.contains(today.weekday()) && self.at(today) > reference {
            return Some(self.at(today));
        }
        (1..=7)
            .map(|offset| today + Duration::days(offset))
            .find(|date| days.contains(date.weekday()))
            .map(|date| self.at(date))
    }

    fn next_interval_days(&self, rule: &IntervalDays, reference: NaiveDateTime) -> NaiveDateTime {
        let today = reference.date();
        let days_since_anchor = (today - rule.anchor()).num_days();
        if days_since_anchor < 0 {
            return self.at(rule.anchor());
        }

        let interval = i64::from(rule.interval());
        let into_cycle = days_since_anchor % interval;
        if into_cycle == 0 && self.at(today) > reference {
            return self.at(today);
        }
        let days_ahead = if into_cycle == 0 {
            interval
        } else {
            interval - into_cycle
        };
        self.at(today + Duration::days(days_ahead))
    }

    fn next_specific_date(
        &self,
        rule: &SpecificDates,
        reference: NaiveDateTime,
    ) -> Option<NaiveDateTime> {
        rule.dates()
            .range(reference.date()..)
            .map(|date| self.at(*date))
            .find(|candidate| *candidate > reference)
    }

    fn next_monthly(&self, rule: &Monthly, reference: NaiveDateTime) -> Option<NaiveDateTime> {
        let today = reference.date();
        let this_month = rule
            .days()
            .iter()
            .filter(|day| **day <= get_month_length(today.year(), today.month()))
            .filter_map(|day| today.with_day(*day))
            .filter(|date| *date >= today)
            .map(|date| self.at(date))
            .find(|candidate| *candidate > reference);
        if this_month.is_some() {
            return this_month;
        }

        // Months without the listed day are skipped, never rolled over
        let mut month_start = today;
        for _ in 0..MONTHLY_SCAN_LIMIT {
            month_start = first_of_next_month(month_start)?;
            let month_length = get_month_length(month_start.year(), month_start.month());
            if let Some(day) = rule.days().iter().find(|day| **day <= month_length) {
                return month_start.with_day(*day).map(|date| self.at(date));
            }
        }
        None
    }
}

/// The anchor is a time of day only, restarting the cycle every day
fn next_interval_hours(rule: &IntervalHours, reference: NaiveDateTime) -> NaiveDateTime {
    let anchor_today = reference.date().and_time(rule.anchor().naive_time());
    if anchor_today > reference {
        return anchor_today;
    }
    let interval = i64::from(rule.interval());
    let hours_elapsed = (reference - anchor_today).num_hours();
    let intervals_ahead = hours_elapsed / interval + 1;
    anchor_today + Duration::hours(intervals_ahead * interval)
}
