use crate::dtos::FailureDTO;
use dose_scheduler_domain::ID;
use serde::{Deserialize, Serialize};

pub mod rearm_all {
    use super::*;

    #[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub scheduled: Vec<ID>,
        /// Reminders whose schedule has no occurrences left
        pub exhausted: Vec<ID>,
        pub failed: Vec<FailureDTO>,
    }
}

pub mod migrate_legacy_schedules {
    use super::*;

    #[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub candidates: usize,
        pub migrated: usize,
        pub failed: Vec<FailureDTO>,
    }
}
