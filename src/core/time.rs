//! Time representation using nanoseconds for frame-accurate trimming.
//! All positions and durations flow through the crate as i64 nanoseconds.

/// Time in nanoseconds since the start of the source media
pub type Time = i64;

/// Time constants for conversions
pub mod constants {
    use super::Time;

    pub const NANOS_PER_SECOND: Time = 1_000_000_000;
    pub const NANOS_PER_MILLI: Time = 1_000_000;
    pub const NANOS_PER_MICRO: Time = 1_000;
}

/// Time zero constant
pub const ZERO: Time = 0;

/// Convert seconds (f64) to nanoseconds (i64)
#[inline]
pub fn from_seconds(seconds: f64) -> Time {
    (seconds * constants::NANOS_PER_SECOND as f64) as Time
}

/// Convert nanoseconds (i64) to seconds (f64)
#[inline]
pub fn to_seconds(nanos: Time) -> f64 {
    nanos as f64 / constants::NANOS_PER_SECOND as f64
}

/// Convert milliseconds to nanoseconds
#[inline]
pub fn from_millis(millis: i64) -> Time {
    millis * constants::NANOS_PER_MILLI
}

/// Convert nanoseconds to milliseconds
#[inline]
pub fn to_millis(nanos: Time) -> i64 {
    nanos / constants::NANOS_PER_MILLI
}

/// Convert microseconds to nanoseconds
#[inline]
pub fn from_micros(micros: i64) -> Time {
    micros * constants::NANOS_PER_MICRO
}

/// Convert nanoseconds to microseconds
#[inline]
pub fn to_micros(nanos: Time) -> i64 {
    nanos / constants::NANOS_PER_MICRO
}

/// Duration of a single frame at the given frame rate
#[inline]
pub fn frame_tick(fps: f64) -> Time {
    from_seconds(1.0 / fps)
}

/// Check two times for equality within a tolerance.
/// Trimmed output durations are compared against the requested range
/// with one frame tick of slack.
#[inline]
pub fn approx_eq(a: Time, b: Time, tolerance: Time) -> bool {
    (a - b).abs() <= tolerance
}

/// Format time as HH:MM:SS.mmm
pub fn format_time(nanos: Time) -> String {
    let total_seconds = to_seconds(nanos);
    let hours = (total_seconds / 3600.0).floor() as i64;
    let minutes = ((total_seconds % 3600.0) / 60.0).floor() as i64;
    let seconds = (total_seconds % 60.0).floor() as i64;
    let millis = to_millis(nanos) % 1000;

    format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis)
}
