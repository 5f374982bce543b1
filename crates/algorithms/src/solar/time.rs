//! Timestamp helpers for the solar models
//!
//! All models take `DateTime<Utc>`, so an instant without an explicit
//! offset cannot reach them. [`parse_timestamp`] is the only place a string
//! becomes a timestamp.

use chrono::{DateTime, Datelike, NaiveDateTime, TimeZone, Timelike, Utc};
use sunshine_core::{Error, Result};

/// Compact `YYYYMMDDHHMM` form, always interpreted as UTC
const COMPACT_FORMAT: &str = "%Y%m%d%H%M";

/// Julian day of the Unix epoch
const JD_UNIX_EPOCH: f64 = 2_440_587.5;

/// Julian day of J2000.0
const JD_J2000: f64 = 2_451_545.0;

/// Day of the year, 1 on January 1st
pub fn day_of_year(timestamp: &DateTime<Utc>) -> u32 {
    timestamp.ordinal()
}

/// Minutes elapsed since UTC midnight, including seconds
pub fn utc_minutes(timestamp: &DateTime<Utc>) -> f64 {
    let seconds = timestamp.num_seconds_from_midnight() as f64
        + timestamp.nanosecond() as f64 * 1e-9;
    seconds / 60.0
}

/// Julian day (UT) of the instant
pub fn julian_day(timestamp: &DateTime<Utc>) -> f64 {
    let seconds = timestamp.timestamp() as f64 + timestamp.timestamp_subsec_nanos() as f64 * 1e-9;
    seconds / 86_400.0 + JD_UNIX_EPOCH
}

/// Julian centuries since J2000.0
pub fn julian_century(timestamp: &DateTime<Utc>) -> f64 {
    (julian_day(timestamp) - JD_J2000) / 36_525.0
}

/// Parse a timestamp supplied by a caller.
///
/// Accepted forms:
/// - `YYYYMMDDHHMM` (e.g. `202006211200`), interpreted as UTC
/// - RFC 3339 with an explicit offset (`2020-06-21T12:00:00Z`,
///   `2020-06-21T14:00:00+02:00`), converted to UTC
///
/// A date-time without offset (`2020-06-21T12:00:00`) is rejected rather
/// than guessed.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    let trimmed = value.trim();

    if trimmed.len() == 12 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        let naive = NaiveDateTime::parse_from_str(trimmed, COMPACT_FORMAT).map_err(|e| {
            Error::InvalidTimestamp {
                value: value.to_string(),
                reason: e.to_string(),
            }
        })?;
        return Ok(Utc.from_utc_datetime(&naive));
    }

    match DateTime::parse_from_rfc3339(trimmed) {
        Ok(dt) => Ok(dt.with_timezone(&Utc)),
        Err(e) => {
            let naive = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
                .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f"));
            let reason = if naive.is_ok() {
                "missing UTC offset; append 'Z' or '+HH:MM'".to_string()
            } else {
                format!("expected YYYYMMDDHHMM or RFC 3339 ({})", e)
            };
            Err(Error::InvalidTimestamp {
                value: value.to_string(),
                reason,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use sunshine_core::ErrorKind;

    #[test]
    fn test_compact_form_is_utc() {
        let ts = parse_timestamp("202006211200").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2020, 6, 21, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_rfc3339_offset_converted() {
        let ts = parse_timestamp("2020-06-21T14:30:00+02:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2020, 6, 21, 12, 30, 0).unwrap());
    }

    #[test]
    fn test_naive_timestamp_rejected() {
        let err = parse_timestamp("2020-06-21T12:00:00").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Input);
        assert!(err.to_string().contains("offset"));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(parse_timestamp("yesterday").is_err());
        assert!(parse_timestamp("202013211200").is_err());
    }

    #[test]
    fn test_julian_day_j2000() {
        let ts = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        assert_relative_eq!(julian_day(&ts), 2_451_545.0, epsilon = 1e-9);
        assert_relative_eq!(julian_century(&ts), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_day_and_minutes() {
        let ts = Utc.with_ymd_and_hms(2020, 6, 21, 12, 30, 30).unwrap();
        assert_eq!(day_of_year(&ts), 173);
        assert_relative_eq!(utc_minutes(&ts), 750.5, epsilon = 1e-12);
    }
}
