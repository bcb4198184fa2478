//! Relative time rendering for notification timestamps

use chrono::{DateTime, Utc};

use crate::utils::parse_timestamp;

/// Render `timestamp` relative to `now`: "Just now", "5m ago", "3h ago",
/// "2d ago", then a short date past a week. Unparsable input is returned as is.
pub fn format_time(timestamp: &str, now: DateTime<Utc>) -> String {
    let Some(at) = parse_timestamp(timestamp) else {
        return timestamp.to_string();
    };

    let elapsed = now.signed_duration_since(at);
    let minutes = elapsed.num_minutes();
    if minutes < 1 {
        return "Just now".to_string();
    }
    if minutes < 60 {
        return format!("{}m ago", minutes);
    }
    let hours = elapsed.num_hours();
    if hours < 24 {
        return format!("{}h ago", hours);
    }
    let days = elapsed.num_days();
    if days < 7 {
        return format!("{}d ago", days);
    }
    at.format("%b %-d, %Y").to_string()
}
