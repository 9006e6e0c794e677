//! Fractional Unix timestamps as sent on the wire (`"1534614057.321597"`).

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Number of fractional digits representable at nanosecond resolution.
const NANO_DIGITS: usize = 9;

/// A point in time split into whole seconds and a nanosecond remainder.
///
/// Parsing splits the string at the decimal point and scales the
/// fractional digits to nanoseconds without going through a float, so
/// `"1534614057.321597"` becomes exactly `1534614057 s + 321_597_000 ns`.
/// Digits beyond nanosecond resolution are truncated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp {
    secs: i64,
    nanos: u32,
}

impl Timestamp {
    /// Creates a timestamp from its parts.
    ///
    /// `nanos` is clamped to below one second.
    #[must_use]
    pub fn new(secs: i64, nanos: u32) -> Self {
        Self {
            secs,
            nanos: nanos.min(999_999_999),
        }
    }

    /// Whole seconds since the Unix epoch.
    #[must_use]
    pub fn secs(&self) -> i64 {
        self.secs
    }

    /// Sub-second remainder in nanoseconds.
    #[must_use]
    pub fn nanos(&self) -> u32 {
        self.nanos
    }

    /// Converts to a [`SystemTime`].
    #[must_use]
    pub fn to_system_time(&self) -> SystemTime {
        if self.secs >= 0 {
            UNIX_EPOCH + Duration::new(self.secs.unsigned_abs(), self.nanos)
        } else {
            UNIX_EPOCH - Duration::from_secs(self.secs.unsigned_abs())
                + Duration::from_nanos(u64::from(self.nanos))
        }
    }
}

/// Error returned when a string is not a fractional Unix timestamp.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid timestamp `{0}`")]
pub struct ParseTimestampError(pub String);

impl FromStr for Timestamp {
    type Err = ParseTimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseTimestampError(s.to_string());

        // Seconds are unsigned on the wire.
        let (whole, fraction) = s.split_once('.').unwrap_or((s, ""));
        if whole.is_empty()
            || !whole.bytes().all(|b| b.is_ascii_digit())
            || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let secs: i64 = whole.parse().map_err(|_| invalid())?;

        let digits = &fraction[..fraction.len().min(NANO_DIGITS)];
        let mut nanos: u32 = 0;
        for (i, b) in digits.bytes().enumerate() {
            nanos += u32::from(b - b'0') * 10u32.pow((NANO_DIGITS - 1 - i) as u32);
        }

        Ok(Self { secs, nanos })
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}", self.secs, self.nanos)
    }
}
