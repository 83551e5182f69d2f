use chrono::{DateTime, Local};
use std::time::{SystemTime, UNIX_EPOCH};

/// Seconds since the epoch, as the exchange expects in auth headers.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

pub fn format_local(at: DateTime<Local>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn clock_now() -> String {
    Local::now().format("%H:%M:%S").to_string()
}
