mod inmemory;
mod tokio_timer;

use dose_scheduler_domain::AlarmPayload;
pub use inmemory::InMemoryPlatformTimer;
pub use tokio_timer::TokioPlatformTimer;

/// A timer that went off
#[derive(Debug, Clone, PartialEq)]
pub struct FiredTimer {
    pub key: i64,
    pub payload: AlarmPayload,
}

/// The OS facility that wakes the process at an exact instant.
///
/// Arming a key that is already armed replaces the previous timer.
#[async_trait::async_trait]
pub trait IPlatformTimer: Send + Sync {
    /// Whether the process is currently allowed to arm exact timers
    fn can_schedule_exact(&self) -> bool;
    /// `fire_at` is a timestamp in millis
    async fn arm_exact(&self, key: i64, fire_at: i64, payload: AlarmPayload)
        -> anyhow::Result<()>;
    /// Cancelling a key that is not armed is a no-op
    async fn cancel(&self, key: i64) -> anyhow::Result<()>;
}
