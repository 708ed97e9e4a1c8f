//! Time and timestamp utilities

use chrono::Utc;

/// Current Unix timestamp in milliseconds
pub fn current_timestamp_ms() -> i64 {
    Utc::now().timestamp_millis()
}
