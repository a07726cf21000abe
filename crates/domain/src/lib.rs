mod alarm;
pub mod date;
mod recurrence;
mod reminder;
pub mod request_code;
mod schedule;
mod shared;
mod time_of_day;
pub mod validation;

pub use alarm::{Alarm, AlarmKind, AlarmPayload, AlarmState};
pub use recurrence::Recurrence;
pub use reminder::{Reminder, ResolvedSchedule, ScheduleSource};
pub use schedule::{
    IntervalDays, IntervalHours, Monthly, ScheduleConfig, ScheduleError, ScheduleType,
    SpecificDates, Weekly,
};
pub use shared::day_set::DaySet;
pub use shared::entity::{Entity, ID};
pub use time_of_day::TimeOfDay;
pub use validation::ValidationError;
