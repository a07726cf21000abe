pub mod create_reminder;
pub mod delete_reminder;
pub mod export_reminders;
pub mod get_next_occurrence;
pub mod get_reminder;
pub mod import_reminders;
pub mod migrate_legacy_schedules;
pub mod set_reminder_enabled;
pub mod snooze_reminder;
pub mod update_reminder;
