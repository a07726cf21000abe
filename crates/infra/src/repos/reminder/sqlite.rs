use super::IReminderRepo;
use crate::repos::create_sqlite_pool;
use chrono::NaiveDate;
use dose_scheduler_domain::{DaySet, Reminder, ScheduleType, TimeOfDay, ID};
use sqlx::{FromRow, SqlitePool};
use std::convert::TryFrom;
use tracing::{error, warn};

pub struct SqliteReminderRepo {
    pool: SqlitePool,
}

impl SqliteReminderRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn connect(connection_string: &str) -> anyhow::Result<Self> {
        Ok(Self::new(create_sqlite_pool(connection_string).await?))
    }
}

#[derive(Debug, FromRow)]
struct ReminderRaw {
    reminder_uid: String,
    subject_uid: String,
    hour: i64,
    minute: i64,
    schedule_type: String,
    schedule_config: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
    enabled: bool,
    legacy_days: String,
    created: i64,
    updated: i64,
}

impl TryFrom<ReminderRaw> for Reminder {
    type Error = anyhow::Error;

    fn try_from(raw: ReminderRaw) -> anyhow::Result<Self> {
        let id = raw.reminder_uid.parse::<ID>()?;
        let schedule_type = raw.schedule_type.parse::<ScheduleType>().unwrap_or_else(|e| {
            warn!(
                "Reminder {} has an unknown schedule type, using the default. Err: {:?}",
                id, e
            );
            ScheduleType::default()
        });
        let legacy_days = raw.legacy_days.parse::<DaySet>().unwrap_or_else(|e| {
            warn!("Reminder {} has unreadable legacy days. Err: {:?}", id, e);
            DaySet::empty()
        });
        Ok(Reminder {
            id,
            subject_id: raw.subject_uid.parse()?,
            time_of_day: TimeOfDay::new(u32::try_from(raw.hour)?, u32::try_from(raw.minute)?)?,
            schedule_type,
            schedule_config: raw.schedule_config,
            start_date: raw.start_date.as_deref().map(parse_stored_date).transpose()?,
            end_date: raw.end_date.as_deref().map(parse_stored_date).transpose()?,
            enabled: raw.enabled,
            legacy_days,
            created: raw.created,
            updated: raw.updated,
        })
    }
}

/// Inverse of `NaiveDate::to_string`, which is how dates are written
fn parse_stored_date(date: &str) -> anyhow::Result<NaiveDate> {
    Ok(date.parse::<NaiveDate>()?)
}

fn into_reminders(rows: Vec<ReminderRaw>) -> Vec<Reminder> {
    rows.into_iter()
        .filter_map(|row| {
            let uid = row.reminder_uid.clone();
            match Reminder::try_from(row) {
                Ok(reminder) => Some(reminder),
                Err(e) => {
                    error!("Unable to read reminder {} from storage. Err: {:?}", uid, e);
                    None
                }
            }
        })
        .collect()
}

const UPSERT_REMINDER: &str = r#"
    INSERT INTO reminders
    (reminder_uid, subject_uid, hour, minute, schedule_type, schedule_config,
     start_date, end_date, enabled, legacy_days, created, updated)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
    ON CONFLICT (reminder_uid) DO UPDATE SET
        subject_uid = excluded.subject_uid,
        hour = excluded.hour,
        minute = excluded.minute,
        schedule_type = excluded.schedule_type,
        schedule_config = excluded.schedule_config,
        start_date = excluded.start_date,
        end_date = excluded.end_date,
        enabled = excluded.enabled,
        legacy_days = excluded.legacy_days,
        created = excluded.created,
        updated = excluded.updated
"#;

const INSERT_REMINDER: &str = r#"
    INSERT INTO reminders
    (reminder_uid, subject_uid, hour, minute, schedule_type, schedule_config,
     start_date, end_date, enabled, legacy_days, created, updated)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

impl SqliteReminderRepo {
    async fn write(&self, statement: &str, reminder: &Reminder) -> anyhow::Result<()> {
        sqlx::query(statement)
            .bind(reminder.id.as_string())
            .bind(reminder.subject_id.as_string())
            .bind(i64::from(reminder.time_of_day.hour()))
            .bind(i64::from(reminder.time_of_day.minute()))
            .bind(reminder.schedule_type.as_str())
            .bind(reminder.schedule_config.as_deref())
            .bind(reminder.start_date.map(|d| d.to_string()))
            .bind(reminder.end_date.map(|d| d.to_string()))
            .bind(reminder.enabled)
            .bind(reminder.legacy_days.to_string())
            .bind(reminder.created)
            .bind(reminder.updated)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl IReminderRepo for SqliteReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()> {
        self.write(INSERT_REMINDER, reminder).await
    }

    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()> {
        self.write(UPSERT_REMINDER, reminder).await
    }

    async fn find(&self, reminder_id: &ID) -> Option<Reminder> {
        let row = sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders AS r
            WHERE r.reminder_uid = ?
            "#,
        )
        .bind(reminder_id.as_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Find reminder with id: {} failed. DB returned error: {:?}", reminder_id, e);
            e
        })
        .ok()??;
        into_reminders(vec![row]).pop()
    }

    async fn find_all(&self) -> anyhow::Result<Vec<Reminder>> {
        let rows = sqlx::query_as::<_, ReminderRaw>("SELECT * FROM reminders ORDER BY created")
            .fetch_all(&self.pool)
            .await?;
        Ok(into_reminders(rows))
    }

    async fn find_enabled(&self) -> anyhow::Result<Vec<Reminder>> {
        let rows = sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders AS r
            WHERE r.enabled = TRUE
            ORDER BY r.created
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(into_reminders(rows))
    }

    async fn delete(&self, reminder_id: &ID) -> Option<Reminder> {
        let row = sqlx::query_as::<_, ReminderRaw>(
            r#"
            DELETE FROM reminders
            WHERE reminder_uid = ?
            RETURNING *
            "#,
        )
        .bind(reminder_id.as_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Delete reminder with id: {} failed. DB returned error: {:?}", reminder_id, e);
            e
        })
        .ok()??;
        into_reminders(vec![row]).pop()
    }
}
