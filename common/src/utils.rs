/// Shared clock helpers
pub mod time {
    use std::time::{SystemTime, UNIX_EPOCH};

    /// Milliseconds since the unix epoch
    pub fn now_millis() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as i64)
            .unwrap_or(0)
    }
}
