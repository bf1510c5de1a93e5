//! Display formatting for sizes, timings and changes
//!
//! All rounding here goes up: a displayed value is never smaller than the
//! measured one.

use crate::compare::get_change;

const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

/// Format bytes using 1024-based units, at most two decimals
///
/// # Examples
///
/// ```
/// use size_report_core::format_bytes;
///
/// assert_eq!(format_bytes(0), "0 B");
/// assert_eq!(format_bytes(1024), "1 KB");
/// assert_eq!(format_bytes(100894), "98.53 KB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    let mut exponent = 0;
    while exponent + 1 < UNITS.len() && bytes >= 1u64 << (10 * (exponent + 1)) {
        exponent += 1;
    }

    // Ties round up at the hundredths, never down to even.
    let value = bytes as f64 / (1u64 << (10 * exponent)) as f64;
    let rounded = (value * 100.0).round() / 100.0;

    format!("{} {}", rounded, UNITS[exponent])
}

/// Format seconds as `s` (tenths, rounded up) or `ms` (rounded up)
pub fn format_time(seconds: f64) -> String {
    if seconds >= 1.0 {
        return format!("{} s", (seconds * 10.0).ceil() / 10.0);
    }

    format!("{} ms", (seconds * 1000.0).ceil())
}

/// Format the change from `base` to `current` with a direction marker
///
/// The magnitude is rounded up at the hundredths.
pub fn format_change(base: f64, current: f64) -> String {
    if base == 0.0 {
        return "+100% 🔺".to_string();
    }

    let change = get_change(base, current);
    let magnitude = (change.abs() * 100.0).ceil() / 100.0;

    if change > 0.0 {
        format!("+{}% 🔺", magnitude)
    } else if change == 0.0 {
        format!("{}%", magnitude)
    } else {
        format!("-{}% 🔽", magnitude)
    }
}
