pub mod alarm;
mod error;
mod job_schedulers;
pub mod reminder;
mod shared;

pub use error::DoseSchedulerError;
use alarm::rearm_all::rearm_all_controller;
use dose_scheduler_infra::{DoseContext, FiredTimer};
use job_schedulers::start_fired_timers_dispatcher;
use reminder::migrate_legacy_schedules::migrate_legacy_schedules_controller;
use tokio::{sync::mpsc::UnboundedReceiver, task::JoinHandle};
use tracing::{info, warn};

pub struct Application {
    context: DoseContext,
    dispatcher: JoinHandle<()>,
}

impl Application {
    /// Brings every reminder up to date and starts handling fired timers
    pub async fn new(
        context: DoseContext,
        fired_timers: UnboundedReceiver<FiredTimer>,
    ) -> Result<Self, DoseSchedulerError> {
        let migration = migrate_legacy_schedules_controller(&context).await?;
        if !migration.failed.is_empty() {
            warn!(
                "{} legacy reminders could not be migrated",
                migration.failed.len()
            );
        }

        let rearm = rearm_all_controller(&context).await?;
        info!(
            "Boot: {} reminders armed, {} exhausted, {} failed",
            rearm.scheduled.len(),
            rearm.exhausted.len(),
            rearm.failed.len()
        );

        let dispatcher = start_fired_timers_dispatcher(context.clone(), fired_timers);
        Ok(Self {
            context,
            dispatcher,
        })
    }

    pub fn context(&self) -> &DoseContext {
        &self.context
    }

    /// Runs until the process is asked to shut down
    pub async fn start(self) -> std::io::Result<()> {
        tokio::signal::ctrl_c().await?;
        info!("Shutting down");
        self.dispatcher.abort();
        Ok(())
    }
}
