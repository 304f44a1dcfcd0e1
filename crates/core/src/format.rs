//! Human-readable formatting helpers shared across the crate.
//!
//! All numeric values exposed on the wire (file sizes, engagement counts,
//! durations) are pre-formatted strings so every client renders them the
//! same way.

/// Format a byte count as a human-readable size, e.g. `1.5 KB`.
///
/// Trailing zeros after the decimal point are trimmed, so exact multiples
/// come out as `1 KB` rather than `1.00 KB`.
pub fn file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut scaled = bytes as f64;
    let mut unit = 0;
    while scaled >= 1024.0 && unit < UNITS.len() - 1 {
        scaled /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{:.2}", scaled);
    let rounded = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", rounded, UNITS[unit])
}

/// Format a count in compact notation: `1.2M`, `3.4K`, or the plain number.
pub fn compact_count(count: u64) -> String {
    if count >= 1_000_000 {
        format!("{:.1}M", count as f64 / 1_000_000.0)
    } else if count >= 1_000 {
        format!("{:.1}K", count as f64 / 1_000.0)
    } else {
        count.to_string()
    }
}

/// Format a duration in seconds as `H:MM:SS`, or `M:SS` when under an hour.
pub fn clock_duration(seconds: f64) -> String {
    let total = seconds.max(0.0).floor() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}
