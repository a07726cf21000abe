mod locks;
mod timer;

pub use locks::ReminderLocks;
pub use timer::{FiredTimer, IPlatformTimer, InMemoryPlatformTimer, TokioPlatformTimer};
