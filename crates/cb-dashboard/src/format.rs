//! Display formatting.

/// `m:ss`, minutes unbounded: 65 → `1:05`, 3600 → `60:00`.
pub fn format_duration(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
