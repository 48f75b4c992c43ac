//! Display formatting for the raw numeric snapshot fields.
//!
//! Pure total functions. Callers substitute 0 for absent fields before
//! calling, so nothing here deals in `Option`.

use chrono::{Duration, Local};

const MEGABYTE: f64 = 1_048_576.0;
const GIBIBYTE: f64 = 1_073_741_824.0;

/// Byte count as megabytes with one decimal, e.g. `"512.0 MB"`.
pub fn format_megabytes(bytes: u64) -> String {
    format!("{:.1} MB", bytes as f64 / MEGABYTE)
}

/// Byte count with an adaptive unit: strictly above 1e9 bytes it switches to
/// gibibyte-divided gigabytes, otherwise megabytes. Both with one decimal.
pub fn format_bytes(bytes: u64) -> String {
    if bytes > 1_000_000_000 {
        format!("{:.1} GB", bytes as f64 / GIBIBYTE)
    } else {
        format_megabytes(bytes)
    }
}

/// Seconds remaining as `HH:MM:SS`, counted from a zero epoch rather than
/// wall-clock. Durations of a day or more wrap the hour field like a
/// day-relative clock would; the producer never emits such values but the
/// function stays total.
pub fn format_eta(seconds: u64) -> String {
    let h = (seconds / 3600) % 24;
    let m = (seconds % 3600) / 60;
    let s = seconds % 60;
    format!("{:02}:{:02}:{:02}", h, m, s)
}

/// Projected local completion time for an ETA, `now + seconds` as
/// `HH:MM:SS`. Out-of-range inputs render as `--:--:--`.
pub fn eta_wall_clock(seconds: u64) -> String {
    let secs = i64::try_from(seconds).unwrap_or(i64::MAX);
    Duration::try_seconds(secs)
        .and_then(|d| Local::now().checked_add_signed(d))
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--:--".to_string())
}

/// Throughput as a whole number of MB/s.
pub fn format_speed(mbps: f64) -> String {
    format!("{:.0} MB/s", mbps.max(0.0))
}

/// The system stats line: cpu / memory percentages and free disk in GB.
pub fn format_sys(cpu: f64, mem: f64, free_gb: f64) -> String {
    format!("{:.1}% / {:.1}% / {:.1} GB", cpu, mem, free_gb)
}
