use chrono::{TimeZone, Utc};
use std::time::Duration;

pub fn millis(y: i32, m: u32, d: u32, hour: u32, minute: u32) -> i64 {
    Utc.with_ymd_and_hms(y, m, d, hour, minute, 0)
        .unwrap()
        .timestamp_millis()
}

/// Polls `condition` until it holds, failing the test after a second
pub async fn wait_until<F: FnMut() -> bool>(mut condition: F) {
    for _ in 0..100 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("Condition was not met in time");
}
