//! Timestamp value object for immutable points in time.

use chrono::{
    DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc,
};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Local date-time layouts accepted when no offset is present.
const LOCAL_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Creates a timestamp from any zoned date-time, keeping the instant.
    pub fn from_zoned<Z: TimeZone>(dt: &DateTime<Z>) -> Self {
        Self(dt.with_timezone(&Utc))
    }

    /// Parses an ISO-8601 date-time.
    ///
    /// Values with an explicit offset keep it. Local date-times and bare
    /// dates (read as midnight) are placed in `local_tz`; a wall-clock time
    /// that falls into a DST gap is rejected, an ambiguous one resolves to
    /// the earlier instant.
    pub fn parse_iso(input: &str, local_tz: &Tz) -> Option<DateTime<FixedOffset>> {
        let input = input.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
            return Some(dt);
        }

        let local = LOCAL_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(input, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })?;

        let zoned = local_tz.from_local_datetime(&local).earliest()?;
        Some(zoned.with_timezone(&zoned.offset().fix()))
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Creates a new timestamp by subtracting the specified number of seconds.
    pub fn minus_secs(&self, secs: i64) -> Self {
        Self(self.0 - Duration::seconds(secs))
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}
