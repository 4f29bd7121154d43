//! Time helpers

/// Current time as epoch milliseconds (persisted timestamp format).
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
