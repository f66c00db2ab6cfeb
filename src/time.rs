//! Instants used for solar geometry.
//!
//! Observations are usually averages over a sampling window and may be
//! stamped in local standard time. The sun is evaluated at the midpoint of the
//! window, in UTC.

use chrono::{DateTime, Duration, Utc};

/// Default averaging window [minutes].
pub const DEFAULT_AVERAGING_MINUTES: f64 = 1.0;

/// Julian Day of the Unix epoch.
const UNIX_EPOCH_JD: f64 = 2_440_587.5;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Shift subtracted from every timestamp [s].
///
/// `gmt_offset_hours` is LST - GMT (negative in the USA).
pub fn shift_seconds(gmt_offset_hours: Option<f64>, averaging_minutes: Option<f64>) -> f64 {
    let avg = averaging_minutes.unwrap_or(DEFAULT_AVERAGING_MINUTES);
    let gmt = gmt_offset_hours.unwrap_or(0.0);
    avg * 30.0 + gmt * 3600.0
}

/// Moves every timestamp to the UTC midpoint of its sampling window.
pub fn adjust_instants(
    timestamps: &[DateTime<Utc>],
    gmt_offset_hours: Option<f64>,
    averaging_minutes: Option<f64>,
) -> Vec<DateTime<Utc>> {
    let shift = shift_seconds(gmt_offset_hours, averaging_minutes);
    let shift = Duration::nanoseconds((shift * 1e9).round() as i64);
    timestamps.iter().map(|t| *t - shift).collect()
}

/// Seconds since the Unix epoch, including the sub-second part.
pub fn unix_seconds(t: &DateTime<Utc>) -> f64 {
    t.timestamp() as f64 + f64::from(t.timestamp_subsec_nanos()) * 1e-9
}

/// Julian Day for a Unix time in seconds.
pub fn julian_day(unix_seconds: f64) -> f64 {
    unix_seconds / SECONDS_PER_DAY + UNIX_EPOCH_JD
}
