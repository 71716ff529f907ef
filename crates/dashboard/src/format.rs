//! Display formatting and unit conversion.
//!
//! Everything here is a plain function of its arguments; date formatting takes
//! an explicit format description instead of sharing a formatter.

use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

pub const METERS_PER_MILE: f64 = 1609.344;
pub const FEET_PER_METER: f64 = 3.281;

/// Hour and minute, 12-hour clock (`7:05`).
pub const CLOCK_TIME: &[BorrowedFormatItem<'static>] =
    format_description!("[hour repr:12 padding:none]:[minute]");
/// `AM` / `PM`.
pub const AM_PM: &[BorrowedFormatItem<'static>] = format_description!("[period]");

pub fn miles_from_meters(meters: f64) -> f64 {
    meters / METERS_PER_MILE
}

pub fn feet_from_meters(meters: f64) -> f64 {
    meters * FEET_PER_METER
}

fn split_seconds(seconds: f64) -> (i64, i64, i64) {
    let total = seconds as i64;
    (total / 3600, (total % 3600) / 60, total % 60)
}

/// `" 1h 05m 09s"` or `" 5m 09s"`; fields are space-padded to two columns.
pub fn format_duration(seconds: f64) -> String {
    let (hours, minutes, secs) = split_seconds(seconds);
    if hours > 0 {
        format!("{hours:2}h {minutes:02}m {secs:02}s")
    } else {
        format!("{minutes:2}m {secs:02}s")
    }
}

/// `"1h 05m"` or `"5m 09s"`.
pub fn format_duration_short(seconds: f64) -> String {
    let (hours, minutes, secs) = split_seconds(seconds);
    if hours > 0 {
        format!("{hours}h {minutes:02}m")
    } else {
        format!("{minutes}m {secs:02}s")
    }
}

/// Seconds per mile, `None` when no distance was covered.
pub fn pace_per_mile(duration_seconds: f64, distance_meters: f64) -> Option<f64> {
    let miles = miles_from_meters(distance_meters);
    (miles > 0.0).then(|| duration_seconds / miles)
}

/// `12345` -> `"12,345"`.
pub fn comma_delimited(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn format_time(
    t: OffsetDateTime,
    format: &[BorrowedFormatItem<'_>],
) -> Result<String, time::error::Format> {
    t.format(format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(3909.0), " 1h 05m 09s");
        assert_eq!(format_duration(309.0), " 5m 09s");
        assert_eq!(format_duration(45_000.0), "12h 30m 00s");
        assert_eq!(format_duration(0.0), " 0m 00s");
    }

    #[test]
    fn test_format_duration_short() {
        assert_eq!(format_duration_short(3909.0), "1h 05m");
        assert_eq!(format_duration_short(309.9), "5m 09s");
    }

    #[test]
    fn test_conversions() {
        assert!((miles_from_meters(1609.344) - 1.0).abs() < 1e-12);
        assert!((feet_from_meters(100.0) - 328.1).abs() < 1e-9);
    }

    #[test]
    fn test_pace_per_mile() {
        let pace = pace_per_mile(1800.0, 2.0 * METERS_PER_MILE).unwrap();
        assert!((pace - 900.0).abs() < 1e-9);
        assert_eq!(pace_per_mile(1800.0, 0.0), None);
    }

    #[test]
    fn test_comma_delimited() {
        assert_eq!(comma_delimited(0), "0");
        assert_eq!(comma_delimited(999), "999");
        assert_eq!(comma_delimited(1000), "1,000");
        assert_eq!(comma_delimited(12_345), "12,345");
        assert_eq!(comma_delimited(-1_234_567), "-1,234,567");
    }

    #[test]
    fn test_format_time() {
        let t = datetime!(2025-10-30 19:05 UTC);
        assert_eq!(format_time(t, CLOCK_TIME).unwrap(), "7:05");
        assert_eq!(format_time(t, AM_PM).unwrap(), "PM");
    }
}
