use super::{FiredTimer, IPlatformTimer};
use crate::system::ISys;
use dose_scheduler_domain::AlarmPayload;
use parking_lot::Mutex;
use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio::{
    sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
};
use tracing::{info, warn};

/// Platform timer backed by one tokio task per armed key.
/// Fired timers are delivered on the channel returned by `new`.
pub struct TokioPlatformTimer {
    sys: Arc<dyn ISys>,
    sender: UnboundedSender<FiredTimer>,
    tasks: Mutex<HashMap<i64, JoinHandle<()>>>,
}

impl TokioPlatformTimer {
    pub fn new(sys: Arc<dyn ISys>) -> (Self, UnboundedReceiver<FiredTimer>) {
        let (sender, receiver) = unbounded_channel();
        let timer = Self {
            sys,
            sender,
            tasks: Mutex::new(HashMap::new()),
        };
        (timer, receiver)
    }
}

#[async_trait::async_trait]
impl IPlatformTimer for TokioPlatformTimer {
    fn can_schedule_exact(&self) -> bool {
        true
    }

    async fn arm_exact(
        &self,
        key: i64,
        fire_at: i64,
        payload: AlarmPayload,
    ) -> anyhow::Result<()> {
        let delay_millis = (fire_at - self.sys.get_timestamp_millis()).max(0) as u64;
        let sender = self.sender.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(delay_millis)).await;
            info!("Timer {} fired for reminder: {}", key, payload.reminder_id);
            if sender.send(FiredTimer { key, payload }).is_err() {
                warn!("Timer {} fired after the dispatcher stopped", key);
            }
        });

        {
            let mut tasks = self.tasks.lock();
            tasks.retain(|_, task| !task.is_finished());
            if let Some(previous) = tasks.insert(key, task) {
                previous.abort();
            }
        }
        Ok(())
    }

    async fn cancel(&self, key: i64) -> anyhow::Result<()> {
        if let Some(task) = self.tasks.lock().remove(&key) {
            task.abort();
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::system::RealSys;
    use dose_scheduler_domain::{AlarmKind, ID};

    fn payload(fire_at: i64) -> AlarmPayload {
        AlarmPayload {
            reminder_id: ID::new(),
            subject_id: ID::new(),
            kind: AlarmKind::Dose,
            fire_at,
        }
    }

    #[tokio::test]
    async fn delivers_fired_timers() {
        let sys = Arc::new(RealSys {});
        let (timer, mut receiver) = TokioPlatformTimer::new(sys.clone());
        let fire_at = sys.get_timestamp_millis() + 10;
        let payload = payload(fire_at);
        timer.arm_exact(7, fire_at, payload.clone()).await.unwrap();

        let fired = receiver.recv().await.expect("Timer to fire");
        assert_eq!(fired, FiredTimer { key: 7, payload });
    }

    #[tokio::test]
    async fn rearming_a_key_replaces_the_timer() {
        let sys = Arc::new(RealSys {});
        let (timer, mut receiver) = TokioPlatformTimer::new(sys.clone());
        let now = sys.get_timestamp_millis();
        timer.arm_exact(7, now + 10, payload(now + 10)).await.unwrap();
        let second = payload(now + 30);
        timer.arm_exact(7, now + 30, second.clone()).await.unwrap();

        let fired = receiver.recv().await.expect("Timer to fire");
        assert_eq!(fired.payload, second);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn cancelled_timers_do_not_fire() {
        let sys = Arc::new(RealSys {});
        let (timer, mut receiver) = TokioPlatformTimer::new(sys.clone());
        let now = sys.get_timestamp_millis();
        timer.arm_exact(7, now + 10, payload(now + 10)).await.unwrap();
        timer.cancel(7).await.unwrap();
        // Unknown keys are fine
        timer.cancel(8).await.unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn forgets_fired_timers() {
        let sys = Arc::new(RealSys {});
        let (timer, mut receiver) = TokioPlatformTimer::new(sys.clone());
        let now = sys.get_timestamp_millis();
        for key in 0..5 {
            timer.arm_exact(key, now, payload(now)).await.unwrap();
        }
        for _ in 0..5 {
            receiver.recv().await.expect("Timer to fire");
        }
        tokio::time::sleep(Duration::from_millis(20)).await;

        timer.arm_exact(9, now + 60_000, payload(now + 60_000)).await.unwrap();
        assert_eq!(timer.tasks.lock().len(), 1);
    }
}
