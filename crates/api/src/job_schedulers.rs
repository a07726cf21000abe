use crate::{alarm::on_fired::OnFiredUseCase, shared::usecase::execute};
use dose_scheduler_infra::{DoseContext, FiredTimer};
use tokio::{sync::mpsc::UnboundedReceiver, task::JoinHandle};
use tracing::{error, info};

/// Handles every timer that fires, one at a time, until the sending side
/// of the channel is dropped
pub fn start_fired_timers_dispatcher(
    ctx: DoseContext,
    mut fired_timers: UnboundedReceiver<FiredTimer>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(fired) = fired_timers.recv().await {
            let key = fired.key;
            match execute(OnFiredUseCase { fired }, &ctx).await {
                Ok(Some(alarm)) => info!(
                    "Timer {} handled, reminder {} is now {:?}",
                    key, alarm.reminder_id, alarm.state
                ),
                Ok(None) => (),
                Err(e) => error!("Unable to handle fired timer {}. Err: {:?}", key, e),
            }
        }
        info!("Fired timers channel closed, stopping dispatcher");
    })
}
