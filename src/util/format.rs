//! Small display-formatting helpers.

use chrono::{DateTime, Utc};

/// Formats an upstream `created` timestamp (RFC 3339) for display.
///
/// Falls back to the raw value when it does not parse, and to "-" when
/// it is empty.
pub fn format_created(created: &str) -> String {
    if created.is_empty() {
        return "-".to_string();
    }
    match created.parse::<DateTime<Utc>>() {
        Ok(ts) => ts.format("%Y-%m-%d %H:%M UTC").to_string(),
        Err(_) => created.to_string(),
    }
}

/// Truncates a cell value to `max` characters, ellipsis included.
pub fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    let kept: String = value.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept)
}
