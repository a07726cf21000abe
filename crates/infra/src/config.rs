use chrono_tz::Tz;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    /// Connection string of the SQLite database holding the `Reminder`s
    pub database_url: String,
    /// The device local timezone. Schedules are computed in local wall
    /// clock time and converted to timestamps in this zone.
    pub timezone: Tz,
    /// Snooze duration in minutes used when the caller does not specify one
    pub snooze_minutes: u32,
}

impl Config {
    pub fn new() -> Self {
        let database_url = match std::env::var("DATABASE_URL") {
            Ok(url) => url,
            Err(_) => {
                let url = "sqlite://dose_scheduler.db".to_string();
                info!(
                    "Did not find DATABASE_URL environment variable. Falling back to: {}",
                    url
                );
                url
            }
        };

        let default_timezone = Tz::UTC;
        let timezone = match std::env::var("TIMEZONE") {
            Ok(tz) => match tz.parse::<Tz>() {
                Ok(tz) => tz,
                Err(_) => {
                    warn!(
                        "The given TIMEZONE: {} is not valid, falling back to the default timezone: {}.",
                        tz, default_timezone
                    );
                    default_timezone
                }
            },
            Err(_) => default_timezone,
        };

        let default_snooze_minutes = 10;
        let snooze_minutes = match std::env::var("SNOOZE_MINUTES") {
            Ok(minutes) => match minutes.parse::<u32>() {
                Ok(minutes) if minutes > 0 => minutes,
                _ => {
                    warn!(
                        "The given SNOOZE_MINUTES: {} is not valid, falling back to the default: {}.",
                        minutes, default_snooze_minutes
                    );
                    default_snooze_minutes
                }
            },
            Err(_) => default_snooze_minutes,
        };

        Self {
            database_url,
            timezone,
            snooze_minutes,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
