mod alarm;
mod export;
mod reminder;

pub mod dtos {
    pub use crate::alarm::dtos::*;
    pub use crate::export::dtos::*;
    pub use crate::reminder::dtos::*;
}

pub use crate::alarm::api::*;
pub use crate::export::api::*;
pub use crate::reminder::api::*;
