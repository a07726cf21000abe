mod alarm;
mod reminder;
mod shared;

pub use alarm::IAlarmRepo;
use alarm::InMemoryAlarmRepo;
pub use reminder::IReminderRepo;
use reminder::{InMemoryReminderRepo, SqliteReminderRepo};
use sqlx::{
    migrate::MigrateError,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use std::{str::FromStr, sync::Arc};
use tracing::info;

#[derive(Clone)]
pub struct Repos {
    pub reminders: Arc<dyn IReminderRepo>,
    pub alarms: Arc<dyn IAlarmRepo>,
}

impl Repos {
    pub async fn create_sqlite(connection_string: &str) -> anyhow::Result<Self> {
        let pool = create_sqlite_pool(connection_string).await?;
        Ok(Self {
            reminders: Arc::new(SqliteReminderRepo::new(pool)),
            alarms: Arc::new(InMemoryAlarmRepo::new()),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            reminders: Arc::new(InMemoryReminderRepo::new()),
            alarms: Arc::new(InMemoryAlarmRepo::new()),
        }
    }
}

/// Opens the database and brings its schema up to date
pub(crate) async fn create_sqlite_pool(connection_string: &str) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(connection_string)?.create_if_missing(true);
    // Every connection to an in-memory database is a database of its own
    let max_connections = if connection_string.contains(":memory:") {
        1
    } else {
        5
    };

    info!("DB CHECKING CONNECTION ...");
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;
    info!("DB CHECKING CONNECTION ... [done]");

    run_migration(&pool).await?;
    Ok(pool)
}

async fn run_migration(pool: &SqlitePool) -> Result<(), MigrateError> {
    sqlx::migrate!().run(pool).await
}
