//! ID generation utilities for tooltrack
//!
//! Tool ids are opaque strings; callers must never parse them.

use rand::Rng;

/// Get current timestamp in milliseconds since Unix epoch
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a unique tool ID
///
/// Format: `tool-{timestamp_ms}-{random_hex}`
/// Example: `tool-1738300800123-a1b2`
pub fn generate_tool_id() -> String {
    let timestamp = now_ms();
    let random: u16 = rand::rng().random();
    format!("tool-{}-{:04x}", timestamp, random)
}
