//! Wall-clock helpers.

use chrono::Utc;

/// Current Unix timestamp in milliseconds (UTC).
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Current Unix timestamp in seconds (UTC).
pub fn now_secs() -> i64 {
    Utc::now().timestamp()
}
