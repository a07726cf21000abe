use super::IAlarmRepo;
use crate::repos::shared::inmemory_repo::*;
use dose_scheduler_domain::{Alarm, ID};

pub struct InMemoryAlarmRepo {
    alarms: parking_lot::Mutex<Vec<Alarm>>,
}

impl InMemoryAlarmRepo {
    pub fn new() -> Self {
        Self {
            alarms: parking_lot::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IAlarmRepo for InMemoryAlarmRepo {
    async fn save(&self, alarm: &Alarm) {
        save(alarm, &self.alarms);
    }

    async fn find(&self, reminder_id: &ID) -> Option<Alarm> {
        find(reminder_id, &self.alarms)
    }

    async fn find_all(&self) -> Vec<Alarm> {
        find_by(&self.alarms, |_| true)
    }

    async fn delete(&self, reminder_id: &ID) -> Option<Alarm> {
        delete(reminder_id, &self.alarms)
    }
}
