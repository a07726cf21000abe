use chrono::Utc;

/// Source of "now" for everything that arms or evaluates a dose alarm.
/// Tests swap it for a clock they can move.
pub trait ISys: Send + Sync {
    /// The current timestamp in millis
    fn get_timestamp_millis(&self) -> i64;
}

/// Wall clock of the device
pub struct RealSys {}

impl ISys for RealSys {
    fn get_timestamp_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}
