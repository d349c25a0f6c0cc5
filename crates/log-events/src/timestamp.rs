//! Event Timestamp Types
//!
//! Event files carry instants either as epoch milliseconds or as ISO-8601
//! strings. Both forms are normalised to a UTC instant on load.
//!
//! # Example
//!
//! ```
//! use log_events::EventTimestamp;
//!
//! let ts: EventTimestamp = "2024-01-01T00:00:00Z".parse().unwrap();
//! assert_eq!(ts.timestamp_millis(), 1_704_067_200_000);
//! ```

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Naive date-time layouts accepted without an offset. These are read as
/// local time.
const NAIVE_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Date-time layouts carrying an offset that RFC 3339 parsing rejects, such as
/// minute precision. A trailing `Z` is rewritten to `+00:00` first.
const ZONED_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%d %H:%M%#z",
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
];

/// Error type for parsing event timestamps.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseTimestampError {
    InvalidFormat(String),
    OutOfRange(String),
}

impl fmt::Display for ParseTimestampError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseTimestampError::InvalidFormat(s) => write!(
                f,
                "invalid timestamp: '{}', expected ISO-8601 or epoch milliseconds",
                s
            ),
            ParseTimestampError::OutOfRange(s) => write!(f, "timestamp out of range: '{}'", s),
        }
    }
}

impl std::error::Error for ParseTimestampError {}

/// An instant at which an event was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventTimestamp(DateTime<Utc>);

impl EventTimestamp {
    /// Wraps an existing UTC instant.
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }

    /// Builds a timestamp from milliseconds since the Unix epoch.
    pub fn from_millis(millis: i64) -> Result<Self, ParseTimestampError> {
        Utc.timestamp_millis_opt(millis)
            .single()
            .map(Self)
            .ok_or_else(|| ParseTimestampError::OutOfRange(millis.to_string()))
    }

    /// Returns the instant in UTC.
    pub fn instant(&self) -> DateTime<Utc> {
        self.0
    }

    /// Milliseconds since the Unix epoch.
    pub fn timestamp_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Returns the instant converted to the given zone.
    pub fn in_zone<Tz: TimeZone>(&self, zone: &Tz) -> DateTime<Tz> {
        self.0.with_timezone(zone)
    }
}

impl From<DateTime<Utc>> for EventTimestamp {
    fn from(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }
}

impl fmt::Display for EventTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

impl FromStr for EventTimestamp {
    type Err = ParseTimestampError;

    /// Parses RFC 3339 strings, other offset-bearing date-times, naive
    /// date-times (local time) and dates reduced to a day, month or year
    /// (UTC start of that period).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Self(instant.with_timezone(&Utc)));
        }

        let zoned = match trimmed.strip_suffix(|c: char| c.eq_ignore_ascii_case(&'z')) {
            Some(rest) => format!("{}+00:00", rest),
            None => trimmed.to_string(),
        };
        for format in ZONED_DATE_TIME_FORMATS {
            if let Ok(instant) = DateTime::parse_from_str(&zoned, format) {
                return Ok(Self(instant.with_timezone(&Utc)));
            }
        }

        for format in NAIVE_DATE_TIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Local
                    .from_local_datetime(&naive)
                    .earliest()
                    .map(|local| Self(local.with_timezone(&Utc)))
                    .ok_or_else(|| ParseTimestampError::OutOfRange(s.to_string()));
            }
        }

        let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .ok()
            .or_else(|| parse_reduced_date(trimmed));
        if let Some(date) = date {
            return date
                .and_hms_opt(0, 0, 0)
                .map(|naive| Self(Utc.from_utc_datetime(&naive)))
                .ok_or_else(|| ParseTimestampError::OutOfRange(s.to_string()));
        }

        Err(ParseTimestampError::InvalidFormat(s.to_string()))
    }
}

/// Parses `YYYY-MM` and `YYYY` as the first day of that month or year.
fn parse_reduced_date(s: &str) -> Option<NaiveDate> {
    let all_digits = |part: &str, len: usize| {
        part.len() == len && part.bytes().all(|b| b.is_ascii_digit())
    };

    let mut parts = s.split('-');
    let year = parts.next().filter(|y| all_digits(*y, 4))?;
    let month = match parts.next() {
        Some(m) if all_digits(m, 2) => m.parse().ok()?,
        Some(_) => return None,
        None => 1,
    };
    if parts.next().is_some() {
        return None;
    }

    NaiveDate::from_ymd_opt(year.parse().ok()?, month, 1)
}

// Serialize as an RFC 3339 string with millisecond precision
impl Serialize for EventTimestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

struct TimestampVisitor;

impl<'de> Visitor<'de> for TimestampVisitor {
    type Value = EventTimestamp;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an ISO-8601 string or epoch milliseconds")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        EventTimestamp::from_millis(v).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        let millis = i64::try_from(v)
            .map_err(|_| E::custom(ParseTimestampError::OutOfRange(v.to_string())))?;
        EventTimestamp::from_millis(millis).map_err(E::custom)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        // Fractional milliseconds are dropped
        if !v.is_finite() || v.abs() > i64::MAX as f64 {
            return Err(E::custom(ParseTimestampError::OutOfRange(v.to_string())));
        }
        EventTimestamp::from_millis(v.trunc() as i64).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for EventTimestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(TimestampVisitor)
    }
}
