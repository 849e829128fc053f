//! Display formatting shared by every render surface.
//!
//! All three surfaces print numbers and timestamps through these helpers so
//! the same report never renders two different strings.

use chrono::{DateTime, Utc};

use crate::numbers::i64_to_f64;

/// Format a metric with a compact K/M suffix.
///
/// Values at or above one million show one decimal with an `M` suffix;
/// values at or above ten thousand show whole thousands with a `K` suffix;
/// everything else gets thousands separators.
#[must_use]
pub fn format_number(n: i64) -> String {
    if n >= 1_000_000 {
        let millions = i64_to_f64(n) / 1_000_000.0;
        format!("{millions:.1}M")
    } else if n >= 10_000 {
        format!("{}K", n / 1_000)
    } else {
        group_thousands(n)
    }
}

fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        grouped.push('-');
    }
    let lead = digits.len() % 3;
    if lead > 0 {
        grouped.push_str(&digits[..lead]);
    }
    for (i, chunk) in digits[lead..].as_bytes().chunks(3).enumerate() {
        if lead > 0 || i > 0 {
            grouped.push(',');
        }
        grouped.push_str(std::str::from_utf8(chunk).unwrap_or(""));
    }
    grouped
}

/// Format the span between two event timestamps, e.g. `"53m"`, `"2h 30m"`.
///
/// Returns an empty string when either bound is missing.
#[must_use]
pub fn format_duration(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> String {
    let (Some(start), Some(end)) = (start, end) else {
        return String::new();
    };

    let total_minutes = (end - start).num_minutes().max(0);
    if total_minutes < 60 {
        return format!("{total_minutes}m");
    }

    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    if minutes == 0 {
        format!("{hours}h")
    } else {
        format!("{hours}h {minutes}m")
    }
}

/// Format an event timestamp for display, e.g. `"01/15 06:42"`.
#[must_use]
pub fn format_event_time(dt: Option<DateTime<Utc>>) -> String {
    dt.map(|dt| dt.format("%m/%d %H:%M").to_string())
        .unwrap_or_default()
}

/// Format a pre-multiplied percentage at one decimal, e.g. `"85.0%"`.
#[must_use]
pub fn format_rate(rate: f64) -> String {
    format!("{rate:.1}%")
}
