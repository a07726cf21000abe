pub mod day_set;
pub mod entity;
