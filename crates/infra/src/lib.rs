mod config;
mod repos;
mod services;
mod system;

pub use config::Config;
pub use repos::{IAlarmRepo, IReminderRepo, Repos};
pub use services::*;
use std::sync::Arc;
pub use system::ISys;
use system::RealSys;
use tokio::sync::mpsc::UnboundedReceiver;

#[derive(Clone)]
pub struct DoseContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub timer: Arc<dyn IPlatformTimer>,
    pub locks: Arc<ReminderLocks>,
}

struct ContextParams {
    pub sqlite_connection_string: String,
}

impl DoseContext {
    pub fn new(
        repos: Repos,
        config: Config,
        sys: Arc<dyn ISys>,
        timer: Arc<dyn IPlatformTimer>,
    ) -> Self {
        Self {
            repos,
            config,
            sys,
            timer,
            locks: Arc::new(ReminderLocks::new()),
        }
    }

    /// Context with in-memory storage and a timer that only fires on request
    pub fn create_inmemory() -> Self {
        Self::new(
            Repos::create_inmemory(),
            Config::new(),
            Arc::new(RealSys {}),
            Arc::new(InMemoryPlatformTimer::new()),
        )
    }

    async fn create(
        params: ContextParams,
        config: Config,
    ) -> anyhow::Result<(Self, UnboundedReceiver<FiredTimer>)> {
        let repos = Repos::create_sqlite(&params.sqlite_connection_string).await?;
        let sys: Arc<dyn ISys> = Arc::new(RealSys {});
        let (timer, fired_timers) = TokioPlatformTimer::new(sys.clone());
        Ok((Self::new(repos, config, sys, Arc::new(timer)), fired_timers))
    }
}

/// Will setup the infrastructure context given the environment.
/// Also returns the receiving end of the timers that fire.
pub async fn setup_context() -> anyhow::Result<(DoseContext, UnboundedReceiver<FiredTimer>)> {
    let config = Config::new();
    DoseContext::create(
        ContextParams {
            sqlite_connection_string: config.database_url.clone(),
        },
        config,
    )
    .await
}
