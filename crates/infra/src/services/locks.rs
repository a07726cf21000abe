use dose_scheduler_domain::ID;
use parking_lot::Mutex as SyncMutex;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per `Reminder`. Every cancel, compute and arm sequence
/// for a reminder runs while holding its guard.
#[derive(Default)]
pub struct ReminderLocks {
    locks: SyncMutex<HashMap<ID, Arc<Mutex<()>>>>,
}

impl ReminderLocks {
    pub fn new() -> Self {
        Default::default()
    }

    pub async fn lock(&self, reminder_id: &ID) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock();
            locks
                .entry(*reminder_id)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }

    /// Drops the lock of a deleted `Reminder`
    pub fn forget(&self, reminder_id: &ID) {
        self.locks.lock().remove(reminder_id);
    }
}
