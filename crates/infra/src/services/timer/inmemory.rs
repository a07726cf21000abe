use super::{FiredTimer, IPlatformTimer};
use dose_scheduler_domain::AlarmPayload;
use parking_lot::Mutex;
use std::{
    collections::HashMap,
    sync::atomic::{AtomicBool, Ordering},
};

/// Platform timer that never fires on its own. Tests fire it explicitly.
pub struct InMemoryPlatformTimer {
    exact_permission: AtomicBool,
    armed: Mutex<HashMap<i64, (i64, AlarmPayload)>>,
}

impl InMemoryPlatformTimer {
    pub fn new() -> Self {
        Self {
            exact_permission: AtomicBool::new(true),
            armed: Mutex::new(HashMap::new()),
        }
    }

    pub fn set_exact_permission(&self, granted: bool) {
        self.exact_permission.store(granted, Ordering::SeqCst);
    }

    /// The instant and payload armed under `key`
    pub fn armed(&self, key: i64) -> Option<(i64, AlarmPayload)> {
        self.armed.lock().get(&key).cloned()
    }

    pub fn armed_count(&self) -> usize {
        self.armed.lock().len()
    }

    /// Fires the timer armed under `key`, as the OS would at its instant
    pub fn fire(&self, key: i64) -> Option<FiredTimer> {
        self.armed
            .lock()
            .remove(&key)
            .map(|(_, payload)| FiredTimer { key, payload })
    }
}

impl Default for InMemoryPlatformTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IPlatformTimer for InMemoryPlatformTimer {
    fn can_schedule_exact(&self) -> bool {
        self.exact_permission.load(Ordering::SeqCst)
    }

    async fn arm_exact(
        &self,
        key: i64,
        fire_at: i64,
        payload: AlarmPayload,
    ) -> anyhow::Result<()> {
        if !self.can_schedule_exact() {
            return Err(anyhow::Error::msg("Exact timers are not permitted"));
        }
        self.armed.lock().insert(key, (fire_at, payload));
        Ok(())
    }

    async fn cancel(&self, key: i64) -> anyhow::Result<()> {
        self.armed.lock().remove(&key);
        Ok(())
    }
}
