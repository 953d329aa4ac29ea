//! Frame rate and frame-of-day timecode value types.
//!
//! Frame rates are kept as exact rationals so that frame arithmetic over
//! a whole clip never accumulates drift. All derived per-hour/minute/second
//! frame counts come from the same integer truncation and stay mutually
//! consistent.

use std::fmt;

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from frame-rate construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameRateError {
    /// Numerator or denominator was zero.
    #[error("frame rate must be positive, got {num}/{den}")]
    NotPositive { num: u32, den: u32 },

    /// String did not look like `N` or `N/D`.
    #[error("malformed frame rate: {0:?}")]
    Malformed(String),
}

/// A positive rational frame rate (e.g. 25/1, 30000/1001).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRate {
    num: u32,
    den: u32,
}

impl FrameRate {
    /// Create a frame rate from numerator and denominator.
    pub fn new(num: u32, den: u32) -> Result<Self, FrameRateError> {
        if num == 0 || den == 0 {
            return Err(FrameRateError::NotPositive { num, den });
        }
        Ok(Self { num, den })
    }

    /// Parse a frame rate string as reported by ffprobe (`"30000/1001"` or `"25"`).
    pub fn parse(s: &str) -> Result<Self, FrameRateError> {
        let malformed = || FrameRateError::Malformed(s.to_string());
        let s = s.trim();
        if let Some((n, d)) = s.split_once('/') {
            let num: u32 = n.parse().map_err(|_| malformed())?;
            let den: u32 = d.parse().map_err(|_| malformed())?;
            Self::new(num, den)
        } else {
            let num: u32 = s.parse().map_err(|_| malformed())?;
            Self::new(num, 1)
        }
    }

    pub fn numerator(&self) -> u32 {
        self.num
    }

    pub fn denominator(&self) -> u32 {
        self.den
    }

    /// Frames per second as a float, for duration-based totals.
    pub fn as_f64(&self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Nominal integer rate (rounded), used for frame-number rollover.
    pub fn nominal(&self) -> u32 {
        (self.num + self.den / 2) / self.den
    }

    /// `floor(fps)` frames in one second.
    pub fn frames_per_second(&self) -> u64 {
        u64::from(self.num) / u64::from(self.den)
    }

    /// `floor(fps * 60)` frames in one minute.
    pub fn frames_per_minute(&self) -> u64 {
        u64::from(self.num) * 60 / u64::from(self.den)
    }

    /// `floor(fps * 3600)` frames in one hour.
    pub fn frames_per_hour(&self) -> u64 {
        u64::from(self.num) * 3600 / u64::from(self.den)
    }

    /// Whole frames elapsed in `ms` milliseconds, truncated toward zero.
    pub fn frames_in_millis(&self, ms: u64) -> u64 {
        ms * u64::from(self.num) / (1000 * u64::from(self.den))
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

/// An (hours, minutes, seconds, frames) timecode counted from UTC midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameOfDayTimecode {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub frames: u32,
}

impl FrameOfDayTimecode {
    pub fn new(hours: u32, minutes: u32, seconds: u32, frames: u32) -> Self {
        Self {
            hours,
            minutes,
            seconds,
            frames,
        }
    }

    /// Frame-of-day timecode for `ts` at `rate`.
    ///
    /// Milliseconds since UTC midnight of the timestamp's own calendar day
    /// are converted to a whole frame count (truncated toward zero), then
    /// decomposed by frames-per-hour, per-minute, and per-second in that
    /// order. The remainder is the frame number and can never go negative
    /// with integer arithmetic; the divisors are clamped to at least 1 so
    /// sub-1 fps rates cannot divide by zero.
    pub fn from_datetime(ts: &DateTime<Utc>, rate: FrameRate) -> Self {
        let ms_since_midnight =
            u64::from(ts.num_seconds_from_midnight()) * 1000 + u64::from(ts.timestamp_subsec_millis());
        let total_frames = rate.frames_in_millis(ms_since_midnight);

        let per_hour = rate.frames_per_hour().max(1);
        let per_minute = rate.frames_per_minute().max(1);
        let per_second = rate.frames_per_second().max(1);

        let hours = total_frames / per_hour;
        let mut rem = total_frames % per_hour;
        let minutes = rem / per_minute;
        rem %= per_minute;
        let seconds = rem / per_second;
        let frames = rem % per_second;

        Self {
            hours: hours as u32,
            minutes: minutes as u32,
            seconds: seconds as u32,
            frames: frames as u32,
        }
    }
}

impl fmt::Display for FrameOfDayTimecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}:{:02}",
            self.hours, self.minutes, self.seconds, self.frames
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn rate(num: u32, den: u32) -> FrameRate {
        FrameRate::new(num, den).unwrap()
    }

    #[test]
    fn parse_accepts_rational_and_integer() {
        assert_eq!(FrameRate::parse("30000/1001").unwrap(), rate(30000, 1001));
        assert_eq!(FrameRate::parse("25").unwrap(), rate(25, 1));
        assert_eq!(FrameRate::parse(" 24/1 ").unwrap(), rate(24, 1));
    }

    #[test]
    fn parse_rejects_garbage_and_zero() {
        assert!(matches!(
            FrameRate::parse("abc"),
            Err(FrameRateError::Malformed(_))
        ));
        assert!(matches!(
            FrameRate::parse("0/0"),
            Err(FrameRateError::NotPositive { .. })
        ));
        assert!(matches!(
            FrameRate::new(25, 0),
            Err(FrameRateError::NotPositive { .. })
        ));
    }

    #[test]
    fn nominal_rounds_ntsc_rates() {
        assert_eq!(rate(30000, 1001).nominal(), 30);
        assert_eq!(rate(24000, 1001).nominal(), 24);
        assert_eq!(rate(25, 1).nominal(), 25);
    }

    #[test]
    fn derived_frame_counts_are_consistent() {
        let r = rate(30000, 1001);
        assert_eq!(r.frames_per_second(), 29);
        assert_eq!(r.frames_per_minute(), 1798);
        assert_eq!(r.frames_per_hour(), 107892);
    }

    #[test]
    fn from_datetime_at_midnight_is_zero() {
        let ts = Utc.with_ymd_and_hms(2025, 6, 18, 0, 0, 0).unwrap();
        let tc = FrameOfDayTimecode::from_datetime(&ts, rate(25, 1));
        assert_eq!(tc, FrameOfDayTimecode::new(0, 0, 0, 0));
    }

    #[test]
    fn from_datetime_one_second_after_midnight() {
        let ts = Utc.with_ymd_and_hms(2025, 6, 18, 0, 0, 1).unwrap();
        let tc = FrameOfDayTimecode::from_datetime(&ts, rate(25, 1));
        assert_eq!(tc, FrameOfDayTimecode::new(0, 0, 1, 0));
    }

    #[test]
    fn from_datetime_one_frame_after_midnight() {
        // 1/25 s = 40 ms
        let ts = Utc
            .with_ymd_and_hms(2025, 6, 18, 0, 0, 0)
            .unwrap()
            .checked_add_signed(chrono::Duration::milliseconds(40))
            .unwrap();
        let tc = FrameOfDayTimecode::from_datetime(&ts, rate(25, 1));
        assert_eq!(tc, FrameOfDayTimecode::new(0, 0, 0, 1));
    }

    #[test]
    fn from_datetime_decomposes_afternoon_time() {
        let ts = Utc.with_ymd_and_hms(2025, 6, 18, 9, 15, 41).unwrap();
        let tc = FrameOfDayTimecode::from_datetime(&ts, rate(25, 1));
        assert_eq!(tc, FrameOfDayTimecode::new(9, 15, 41, 0));
    }

    #[test]
    fn displays_as_colon_separated() {
        let tc = FrameOfDayTimecode::new(9, 5, 41, 12);
        assert_eq!(tc.to_string(), "09:05:41:12");
    }
}
