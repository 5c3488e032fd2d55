//! Registration status vocabulary and the CRM status normalizer.
//!
//! The CRM reports attendee status as free text. Normalization is a fixed
//! two-stage table lookup (typo correction, then mapping) and always yields a
//! status: an unrecognized value falls back to `Registered` rather than
//! aborting the delivery.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, ValidationError};

/// Internal registration states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    Registered,
    Pending,
    Rejected,
    Cancelled,
    Attended,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Registered => "registered",
            RegistrationStatus::Pending => "pending",
            RegistrationStatus::Rejected => "rejected",
            RegistrationStatus::Cancelled => "cancelled",
            RegistrationStatus::Attended => "attended",
        }
    }
}

impl fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegistrationStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "registered" => Ok(RegistrationStatus::Registered),
            "pending" => Ok(RegistrationStatus::Pending),
            "rejected" => Ok(RegistrationStatus::Rejected),
            "cancelled" => Ok(RegistrationStatus::Cancelled),
            "attended" => Ok(RegistrationStatus::Attended),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown registration status '{}'", other),
            )),
        }
    }
}

/// Known misspellings emitted by the CRM, keyed by the lower-cased raw value.
static STATUS_TYPOS: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| HashMap::from([("actice", "active")]));

/// CRM status (after typo correction) to internal status.
static STATUS_MAP: Lazy<HashMap<&'static str, RegistrationStatus>> = Lazy::new(|| {
    HashMap::from([
        ("active", RegistrationStatus::Registered),
        ("pending_organizer_approval", RegistrationStatus::Pending),
        ("denied", RegistrationStatus::Rejected),
        ("organizer_accepted_cancellation", RegistrationStatus::Cancelled),
    ])
});

/// Maps a raw CRM status plus optional check-in onto a `RegistrationStatus`.
///
/// A check-in always wins and yields `Attended`.
pub fn normalize_status(
    raw_status: &str,
    check_in_at: Option<&DateTime<FixedOffset>>,
) -> RegistrationStatus {
    if check_in_at.is_some() {
        return RegistrationStatus::Attended;
    }

    let lowered = raw_status.to_lowercase();
    let corrected = STATUS_TYPOS
        .get(lowered.as_str())
        .copied()
        .unwrap_or(lowered.as_str());

    STATUS_MAP
        .get(corrected)
        .copied()
        .unwrap_or(RegistrationStatus::Registered)
}

/// Parses an optional check-in timestamp. Unparseable values count as absent.
/// A check-in without an offset is read in `business_tz`.
pub fn parse_check_in(raw: Option<&str>, business_tz: &Tz) -> Option<DateTime<FixedOffset>> {
    raw.and_then(|r| Timestamp::parse_iso(r, business_tz))
}
