mod telemetry;

use dose_scheduler_api::Application;
use dose_scheduler_infra::setup_context;
use telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber("dose_scheduler".into(), "info".into());
    init_subscriber(subscriber);

    let (context, fired_timers) = setup_context().await?;

    let app = Application::new(context, fired_timers).await?;
    app.start().await?;
    Ok(())
}
