mod inmemory;
mod sqlite;

pub use inmemory::InMemoryReminderRepo;
pub use sqlite::SqliteReminderRepo;

use dose_scheduler_domain::{Reminder, ID};

#[async_trait::async_trait]
pub trait IReminderRepo: Send + Sync {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()>;
    /// Inserts or replaces the `Reminder`
    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()>;
    async fn find(&self, reminder_id: &ID) -> Option<Reminder>;
    async fn find_all(&self) -> anyhow::Result<Vec<Reminder>>;
    async fn find_enabled(&self) -> anyhow::Result<Vec<Reminder>>;
    async fn delete(&self, reminder_id: &ID) -> Option<Reminder>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Weekday};
    use dose_scheduler_domain::{
        DaySet, IntervalDays, ScheduleConfig, ScheduleType, TimeOfDay,
    };
    use std::sync::Arc;

    async fn repos() -> Vec<Arc<dyn IReminderRepo>> {
        let inmemory: Arc<dyn IReminderRepo> = Arc::new(InMemoryReminderRepo::new());
        let sqlite: Arc<dyn IReminderRepo> = Arc::new(
            SqliteReminderRepo::connect("sqlite::memory:")
                .await
                .expect("To open in memory sqlite"),
        );
        vec![inmemory, sqlite]
    }

    fn reminder() -> Reminder {
        let schedule = ScheduleConfig::IntervalDays(
            IntervalDays::new(2, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()).unwrap(),
        );
        let mut reminder =
            Reminder::new(ID::new(), TimeOfDay::new(8, 30).unwrap(), &schedule, 1000).unwrap();
        reminder.start_date = NaiveDate::from_ymd_opt(2024, 1, 1);
        reminder.end_date = NaiveDate::from_ymd_opt(2024, 12, 31);
        reminder
    }

    #[tokio::test]
    async fn create_and_delete() {
        for repo in repos().await {
            let reminder = reminder();

            // Insert
            assert!(repo.insert(&reminder).await.is_ok());

            // Find
            let res = repo.find(&reminder.id).await.expect("To find reminder");
            assert_eq!(res, reminder);
            assert_eq!(repo.find_all().await.unwrap().len(), 1);

            // Delete
            let res = repo.delete(&reminder.id).await;
            assert_eq!(res.map(|r| r.id), Some(reminder.id));

            // Find
            assert!(repo.find(&reminder.id).await.is_none());
            assert!(repo.delete(&reminder.id).await.is_none());
        }
    }

    #[tokio::test]
    async fn save_inserts_and_updates() {
        for repo in repos().await {
            let mut reminder = reminder();

            // Save acts as insert for unknown reminders
            assert!(repo.save(&reminder).await.is_ok());
            assert!(repo.find(&reminder.id).await.is_some());

            reminder.enabled = false;
            reminder.set_schedule(&ScheduleConfig::Daily, 2000).unwrap();
            assert!(repo.save(&reminder).await.is_ok());

            let res = repo.find(&reminder.id).await.unwrap();
            assert!(!res.enabled);
            assert_eq!(res.updated, 2000);
            assert_eq!(res.schedule_type, ScheduleType::Daily);
            assert_eq!(repo.find_all().await.unwrap().len(), 1);
        }
    }

    #[tokio::test]
    async fn finds_only_enabled() {
        for repo in repos().await {
            let enabled = reminder();
            let mut disabled = reminder();
            disabled.enabled = false;
            repo.insert(&enabled).await.unwrap();
            repo.insert(&disabled).await.unwrap();

            let res = repo.find_enabled().await.unwrap();
            assert_eq!(res.len(), 1);
            assert_eq!(res[0].id, enabled.id);
        }
    }

    #[tokio::test]
    async fn keeps_legacy_records_intact() {
        for repo in repos().await {
            let mut legacy = reminder();
            legacy.schedule_config = None;
            legacy.schedule_type = ScheduleType::Weekly;
            legacy.legacy_days = DaySet::from_days(&[Weekday::Mon, Weekday::Thu]);
            legacy.start_date = None;
            legacy.end_date = None;
            repo.insert(&legacy).await.unwrap();

            let res = repo.find(&legacy.id).await.unwrap();
            assert_eq!(res, legacy);
            assert!(res.needs_migration());
        }
    }

    #[tokio::test]
    async fn keeps_dates_far_from_today() {
        for repo in repos().await {
            let mut reminder = reminder();
            reminder.start_date = NaiveDate::from_ymd_opt(1969, 12, 31);
            reminder.end_date = NaiveDate::from_ymd_opt(2150, 1, 1);
            repo.insert(&reminder).await.unwrap();

            let res = repo.find(&reminder.id).await.expect("To find reminder");
            assert_eq!(res, reminder);
            assert_eq!(repo.find_enabled().await.unwrap().len(), 1);
        }
    }
}
