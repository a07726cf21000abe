use dose_scheduler_api::Application;
use dose_scheduler_infra::{Config, DoseContext, FiredTimer, ISys, InMemoryPlatformTimer, Repos};
use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc,
};
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};

pub struct TestSys {
    now: AtomicI64,
}

impl TestSys {
    pub fn set(&self, now: i64) {
        self.now.store(now, Ordering::SeqCst);
    }
}

impl ISys for TestSys {
    fn get_timestamp_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Device state that survives a reboot of the application
pub struct TestDevice {
    pub ctx: DoseContext,
    pub timer: Arc<InMemoryPlatformTimer>,
    pub sys: Arc<TestSys>,
}

impl TestDevice {
    /// A device with an empty SQLite database, in UTC, with the clock set to `now`
    pub async fn new(now: i64) -> Self {
        let repos = Repos::create_sqlite("sqlite::memory:")
            .await
            .expect("To create database");
        let mut config = Config::new();
        config.timezone = chrono_tz::UTC;
        config.snooze_minutes = 10;
        let timer = Arc::new(InMemoryPlatformTimer::new());
        let sys = Arc::new(TestSys {
            now: AtomicI64::new(now),
        });
        let ctx = DoseContext::new(repos, config, sys.clone(), timer.clone());
        Self { ctx, timer, sys }
    }
}

pub struct TestApp {
    pub app: Application,
    fired_timers: UnboundedSender<FiredTimer>,
}

impl TestApp {
    /// Delivers the timer armed under `key` to the application, as the
    /// platform would when its instant is reached
    pub fn fire(&self, device: &TestDevice, key: i64) {
        let fired = device.timer.fire(key).expect("Timer to be armed");
        self.fired_timers
            .send(fired)
            .expect("Dispatcher to be running");
    }
}

/// Boots the application on the device
pub async fn spawn_app(device: &TestDevice) -> TestApp {
    let (sender, receiver) = unbounded_channel();
    let app = Application::new(device.ctx.clone(), receiver)
        .await
        .expect("Failed to build application.");
    TestApp {
        app,
        fired_timers: sender,
    }
}
