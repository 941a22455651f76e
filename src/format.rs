// src/format.rs

//! Small formatters shared by job descriptions and table rows.

use chrono::{DateTime, Local};

/// 1 GiB, the unit used for free-space reporting.
pub const GIB: u64 = 1024 * 1024 * 1024;

/// Layout used for start times.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Whole GiB, rounded down.
pub fn bytes_to_gib(bytes: u64) -> u64 {
    bytes / GIB
}

pub fn format_timestamp(ts: &DateTime<Local>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Elapsed time as `2h5m3s`, `5m0s` or `42s`; negative spans print as `0s`.
pub fn format_elapsed(d: chrono::TimeDelta) -> String {
    let secs = d.num_seconds().max(0);
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{h}h{m}m{s}s")
    } else if m > 0 {
        format!("{m}m{s}s")
    } else {
        format!("{s}s")
    }
}
