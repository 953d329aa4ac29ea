//! Marker payload parsing.
//!
//! A valid payload starts with the `oT` prefix and embeds a
//! `YYMMDDHHMMSS.mmm` timestamp, optionally followed by an explicit
//! whole-hour UTC offset field (`oTI<hours>`). Example:
//! `oT250618091541.679oTD1oTZ2oTI0`.
//!
//! An earlier field recorder firmware was handled by assuming a fixed
//! +2-hour zone regardless of payload contents; the explicit `oTI` field
//! (defaulting to 0 when absent) is the canonical behavior.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Mandatory payload prefix.
pub const MARKER_PREFIX: &str = "oT";

static TIMESTAMP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"oT(\d{12}\.\d{3})").unwrap());
static OFFSET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"oTI(-?\d+)").unwrap());

/// Errors from marker payload parsing. Each failure point is distinct so
/// the scanner can tell a non-marker payload from a corrupted one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Payload does not start with the mandatory prefix.
    #[error("marker payload does not start with '{MARKER_PREFIX}'")]
    BadPrefix,

    /// No `YYMMDDHHMMSS.mmm` field anywhere in the payload.
    #[error("marker payload has no timestamp field")]
    MissingTimestamp,

    /// A timestamp component is out of range (e.g. month 13).
    #[error("invalid {field} in marker timestamp: {value}")]
    InvalidField {
        field: &'static str,
        value: String,
    },

    /// The `oTI` offset field is present but unusable.
    #[error("invalid UTC offset field: {0}")]
    InvalidOffset(String),
}

/// Parse a marker payload into a UTC timestamp with millisecond precision.
pub fn parse(payload: &str) -> Result<DateTime<Utc>, ParseError> {
    parse_with_reference_year(payload, Utc::now().year())
}

/// Like [`parse`], with the year used for century disambiguation supplied
/// by the caller.
pub fn parse_with_reference_year(
    payload: &str,
    reference_year: i32,
) -> Result<DateTime<Utc>, ParseError> {
    if !payload.starts_with(MARKER_PREFIX) {
        return Err(ParseError::BadPrefix);
    }

    let caps = TIMESTAMP_RE
        .captures(payload)
        .ok_or(ParseError::MissingTimestamp)?;
    let ts = caps.get(1).expect("capture group 1 exists").as_str();

    // Fixed character offsets within "YYMMDDHHMMSS.mmm"; the regex
    // guarantees digits, range checks happen at date construction.
    let year = resolve_century(digits(ts, 0, 2), reference_year);
    let month = digits(ts, 2, 4);
    let day = digits(ts, 4, 6);
    let hour = digits(ts, 6, 8);
    let minute = digits(ts, 8, 10);
    let second = digits(ts, 10, 12);
    let millisecond = digits(ts, 13, 16);

    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| ParseError::InvalidField {
        field: "date",
        value: ts[0..6].to_string(),
    })?;
    let time = NaiveTime::from_hms_milli_opt(hour, minute, second, millisecond).ok_or_else(|| {
        ParseError::InvalidField {
            field: "time",
            value: ts[6..].to_string(),
        }
    })?;

    let offset_hours: i32 = match OFFSET_RE.captures(payload) {
        Some(c) => {
            let raw = c.get(1).expect("capture group 1 exists").as_str();
            raw.parse()
                .map_err(|_| ParseError::InvalidOffset(raw.to_string()))?
        }
        None => 0,
    };
    let offset = FixedOffset::east_opt(offset_hours.saturating_mul(3600))
        .ok_or_else(|| ParseError::InvalidOffset(offset_hours.to_string()))?;

    let local = date.and_time(time);
    let aware = local
        .and_local_timezone(offset)
        .single()
        .ok_or_else(|| ParseError::InvalidField {
            field: "datetime",
            value: ts.to_string(),
        })?;

    Ok(aware.with_timezone(&Utc))
}

/// Resolve a 2-digit year against `reference_year`: values more than ten
/// years ahead of the reference are taken from the previous century.
fn resolve_century(two_digit: u32, reference_year: i32) -> i32 {
    let mut prefix = (reference_year / 100) * 100;
    if two_digit as i32 > (reference_year % 100) + 10 {
        prefix -= 100;
    }
    prefix + two_digit as i32
}

fn digits(s: &str, start: usize, end: usize) -> u32 {
    s[start..end].parse().expect("regex guarantees digits")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_reference_payload() {
        let ts = parse_with_reference_year("oT250618091541.679oTD1oTZ2oTI0", 2025).unwrap();
        let expected = Utc
            .with_ymd_and_hms(2025, 6, 18, 9, 15, 41)
            .unwrap()
            .checked_add_signed(chrono::Duration::milliseconds(679))
            .unwrap();
        assert_eq!(ts, expected);
    }

    #[test]
    fn explicit_zero_offset_means_utc() {
        // The oTZ field never contributes; only oTI does.
        let ts = parse_with_reference_year("oT250618120000.000oTD1oTZ2oTI0", 2025).unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2025, 6, 18, 12, 0, 0).unwrap());
    }

    #[test]
    fn positive_offset_shifts_back_to_utc() {
        let ts = parse_with_reference_year("oT250618120000.000oTD1oTZ2oTI2", 2025).unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2025, 6, 18, 10, 0, 0).unwrap());
    }

    #[test]
    fn negative_offset_shifts_forward_to_utc() {
        let ts = parse_with_reference_year("oT250618120000.000oTI-5", 2025).unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2025, 6, 18, 17, 0, 0).unwrap());
    }

    #[test]
    fn missing_offset_defaults_to_utc() {
        let ts = parse_with_reference_year("oT250618120000.500", 2025).unwrap();
        assert_eq!(
            ts,
            Utc.with_ymd_and_hms(2025, 6, 18, 12, 0, 0)
                .unwrap()
                .checked_add_signed(chrono::Duration::milliseconds(500))
                .unwrap()
        );
    }

    #[test]
    fn round_trips_a_grid_of_timestamps() {
        for (y, mo, d) in [(24, 1, 1), (25, 6, 18), (26, 12, 31)] {
            for ms in [0u32, 1, 679, 999] {
                for off in [-8i32, -1, 0, 3, 11] {
                    let payload =
                        format!("oT{y:02}{mo:02}{d:02}143015.{ms:03}oTD0oTZ0oTI{off}");
                    let parsed = parse_with_reference_year(&payload, 2025).unwrap();
                    let expected = FixedOffset::east_opt(off * 3600)
                        .unwrap()
                        .with_ymd_and_hms(2000 + y, mo, d, 14, 30, 15)
                        .unwrap()
                        .checked_add_signed(chrono::Duration::milliseconds(ms.into()))
                        .unwrap()
                        .with_timezone(&Utc);
                    assert_eq!(parsed, expected, "payload {payload}");
                }
            }
        }
    }

    #[test]
    fn century_boundary_is_exact() {
        // Reference 2025: threshold is 25 + 10 = 35.
        let at_threshold = parse_with_reference_year("oT350101000000.000", 2025).unwrap();
        assert_eq!(at_threshold.year(), 2035);
        let above_threshold = parse_with_reference_year("oT360101000000.000", 2025).unwrap();
        assert_eq!(above_threshold.year(), 1936);
    }

    #[test]
    fn rejects_missing_prefix() {
        assert_eq!(
            parse_with_reference_year("xT250618091541.679", 2025),
            Err(ParseError::BadPrefix)
        );
    }

    #[test]
    fn rejects_missing_timestamp_body() {
        assert_eq!(
            parse_with_reference_year("oTD1oTZ2", 2025),
            Err(ParseError::MissingTimestamp)
        );
        // Too few digits is the same failure.
        assert_eq!(
            parse_with_reference_year("oT2506180915.679", 2025),
            Err(ParseError::MissingTimestamp)
        );
    }

    #[test]
    fn rejects_impossible_date() {
        let err = parse_with_reference_year("oT251340091541.000", 2025).unwrap_err();
        assert!(matches!(err, ParseError::InvalidField { field: "date", .. }));
    }

    #[test]
    fn rejects_out_of_range_offset() {
        let err = parse_with_reference_year("oT250618091541.679oTI99", 2025).unwrap_err();
        assert!(matches!(err, ParseError::InvalidOffset(_)));
    }
}
