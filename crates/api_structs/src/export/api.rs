use crate::dtos::{ExportBundleDTO, FailureDTO};
use dose_scheduler_domain::ID;
use serde::{Deserialize, Serialize};

pub mod export_reminders {
    use super::*;

    pub type APIResponse = ExportBundleDTO;
}

pub mod import_reminders {
    use super::*;

    pub type RequestBody = ExportBundleDTO;

    #[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub imported: Vec<ID>,
        pub failed: Vec<FailureDTO>,
    }
}
