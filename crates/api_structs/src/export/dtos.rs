use crate::dtos::ReminderDTO;
use serde::{Deserialize, Serialize};

pub const EXPORT_FORMAT_VERSION: u32 = 1;

/// Every `Reminder` of the device in a flat, portable structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundleDTO {
    pub version: u32,
    pub exported_at: i64,
    pub reminders: Vec<ReminderDTO>,
}
