mod inmemory;

use dose_scheduler_domain::{Alarm, ID};
pub use inmemory::InMemoryAlarmRepo;

/// Scheduler state of every `Reminder` seen since start. It is rebuilt by
/// `rearm_all` on boot and therefore never persisted.
#[async_trait::async_trait]
pub trait IAlarmRepo: Send + Sync {
    async fn save(&self, alarm: &Alarm);
    async fn find(&self, reminder_id: &ID) -> Option<Alarm>;
    async fn find_all(&self) -> Vec<Alarm>;
    async fn delete(&self, reminder_id: &ID) -> Option<Alarm>;
}
