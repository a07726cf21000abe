pub mod on_fired;
pub mod rearm_all;
pub mod scheduler;
