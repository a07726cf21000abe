use chrono::{prelude::*, Duration, LocalResult};
use chrono_tz::Tz;

pub fn is_leap_year(year: i32) -> bool {
    year % 400 == 0 || (year % 100 != 0 && year % 4 == 0)
}

// month: January -> 1
pub fn get_month_length(year: i32, month: u32) -> u32 {
    match month {
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// First day of the month following the month of `date`
pub fn first_of_next_month(date: NaiveDate) -> Option<NaiveDate> {
    if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    }
}

/// Device local wall clock time of a timestamp
pub fn to_local_datetime(timestamp_millis: i64, tz: &Tz) -> Option<NaiveDateTime> {
    tz.timestamp_millis_opt(timestamp_millis)
        .single()
        .map(|dt| dt.naive_local())
}

/// Timestamp of a device local wall clock time.
///
/// Ambiguous times (clocks turned back) resolve to the earliest instant.
/// Times inside a gap (clocks turned forward) are moved forward by the
/// length of the gap.
pub fn to_timestamp_millis(local: &NaiveDateTime, tz: &Tz) -> i64 {
    match tz.from_local_datetime(local) {
        LocalResult::Single(dt) => dt.timestamp_millis(),
        LocalResult::Ambiguous(earliest, _) => earliest.timestamp_millis(),
        LocalResult::None => {
            let offset_before_gap = tz
                .offset_from_utc_datetime(&(*local - Duration::days(1)))
                .fix()
                .local_minus_utc();
            let utc = *local - Duration::seconds(i64::from(offset_before_gap));
            Utc.from_utc_datetime(&utc).timestamp_millis()
        }
    }
}
