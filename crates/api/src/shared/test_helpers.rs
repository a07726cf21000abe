use chrono::{NaiveDate, TimeZone, Utc};
use dose_scheduler_domain::{Reminder, ScheduleConfig, TimeOfDay, ID};
use dose_scheduler_infra::{DoseContext, ISys, InMemoryPlatformTimer};
use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc,
};

/// Clock that only moves when told to
pub struct StaticTimeSys {
    now: AtomicI64,
}

impl StaticTimeSys {
    pub fn new(now: i64) -> Self {
        Self {
            now: AtomicI64::new(now),
        }
    }

    pub fn set(&self, now: i64) {
        self.now.store(now, Ordering::SeqCst);
    }
}

impl ISys for StaticTimeSys {
    fn get_timestamp_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

pub struct TestContext {
    pub ctx: DoseContext,
    pub timer: Arc<InMemoryPlatformTimer>,
    pub sys: Arc<StaticTimeSys>,
}

/// In-memory context in UTC with the clock set to `now`
pub fn setup(now: i64) -> TestContext {
    let timer = Arc::new(InMemoryPlatformTimer::new());
    let sys = Arc::new(StaticTimeSys::new(now));
    let mut ctx = DoseContext::create_inmemory();
    ctx.timer = timer.clone();
    ctx.sys = sys.clone();
    ctx.config.timezone = chrono_tz::UTC;
    TestContext { ctx, timer, sys }
}

pub fn millis(y: i32, m: u32, d: u32, hour: u32, minute: u32) -> i64 {
    Utc.with_ymd_and_hms(y, m, d, hour, minute, 0)
        .unwrap()
        .timestamp_millis()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub async fn insert_reminder(
    ctx: &DoseContext,
    hour: u32,
    minute: u32,
    schedule: ScheduleConfig,
) -> Reminder {
    let reminder = Reminder::new(
        ID::new(),
        TimeOfDay::new(hour, minute).unwrap(),
        &schedule,
        ctx.sys.get_timestamp_millis(),
    )
    .unwrap();
    ctx.repos.reminders.insert(&reminder).await.unwrap();
    reminder
}
