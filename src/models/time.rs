//! Hour-based time arithmetic.
//!
//! Processing times are real-valued hours; timestamps are UTC instants.
//! Conversion goes through whole milliseconds.

use chrono::{DateTime, Duration, Utc};

const MS_PER_HOUR: f64 = 3_600_000.0;

/// Converts fractional hours to a duration (millisecond precision).
pub fn hours(h: f64) -> Duration {
    Duration::milliseconds((h * MS_PER_HOUR).round() as i64)
}

/// Like [`hours`], but `None` when `h` is not finite or exceeds the
/// range of a millisecond duration.
pub fn checked_hours(h: f64) -> Option<Duration> {
    let ms = (h * MS_PER_HOUR).round();
    if !ms.is_finite() || ms.abs() >= i64::MAX as f64 {
        return None;
    }
    Duration::try_milliseconds(ms as i64)
}

/// Length of a duration in fractional hours.
pub fn as_hours(d: Duration) -> f64 {
    d.num_milliseconds() as f64 / MS_PER_HOUR
}

/// Signed hours from `from` to `to`.
pub fn hours_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    as_hours(to - from)
}
