use crate::alarm::scheduler::AlarmError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum DoseSchedulerError {
    #[error("Internal error")]
    InternalError,
    #[error("Invalid data provided: Error message: `{0}`")]
    BadClientData(String),
    #[error("There was a conflict with the request. Error message: `{0}`")]
    Conflict(String),
    #[error("Permission to schedule exact alarms is missing. Error message: `{0}`")]
    PermissionDenied(String),
    #[error("404 Not found. Error message: `{0}`")]
    NotFound(String),
}

impl From<AlarmError> for DoseSchedulerError {
    fn from(e: AlarmError) -> Self {
        match e {
            AlarmError::PermissionDenied => Self::PermissionDenied(e.to_string()),
            AlarmError::Schedule(_) => Self::Conflict(e.to_string()),
            AlarmError::InvalidTimestamp(_) => Self::BadClientData(e.to_string()),
            AlarmError::Timer(_) => Self::InternalError,
        }
    }
}
