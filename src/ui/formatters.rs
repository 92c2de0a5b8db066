use chrono::{DateTime, Local, TimeZone};
use humansize::{format_size, BINARY};

use crate::core::process_monitor::ControlOutcome;

/// Format a MiB quantity in human-readable binary units (KiB, MiB, GiB)
pub fn format_memory_mb(memory_mb: f64) -> String {
    let bytes = (memory_mb.max(0.0) * 1024.0 * 1024.0).round() as u64;
    format_size(bytes, BINARY)
}

/// Format cumulative CPU time as `H:MM:SS.ss`, dropping the hour when zero
pub fn format_cpu_time(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let hours = (seconds / 3600.0).floor() as u64;
    let minutes = ((seconds % 3600.0) / 60.0).floor() as u64;
    let secs = seconds % 60.0;

    if hours > 0 {
        format!("{}:{:02}:{:05.2}", hours, minutes, secs)
    } else {
        format!("{}:{:05.2}", minutes, secs)
    }
}

pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Format a Unix timestamp in local time (YYYY-MM-DD HH:MM:SS)
pub fn format_timestamp(timestamp: i64) -> String {
    match Local.timestamp_opt(timestamp, 0).single() {
        Some(datetime) => {
            let datetime: DateTime<Local> = datetime;
            datetime.format("%Y-%m-%d %H:%M:%S").to_string()
        }
        None => "-".to_string(),
    }
}

/// One-line success/failure summary of a control operation
pub fn format_outcome(action: &str, pid: u32, outcome: ControlOutcome) -> String {
    if outcome.is_success() {
        format!("{} PID {}: done", action, pid)
    } else {
        format!("{} PID {} failed: {}", action, pid, outcome)
    }
}
