//! CRM person projection.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{MemberId, Timestamp, ValidationError};

/// Kind of CRM person record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberType {
    Contact,
    Lead,
}

impl MemberType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberType::Contact => "contact",
            MemberType::Lead => "lead",
        }
    }
}

impl fmt::Display for MemberType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemberType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "contact" => Ok(MemberType::Contact),
            "lead" => Ok(MemberType::Lead),
            other => Err(ValidationError::invalid_format(
                "person.type",
                format!("expected 'contact' or 'lead', got '{}'", other),
            )),
        }
    }
}

/// A person known to the CRM, keyed by the CRM's own identifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Member {
    pub id: MemberId,
    pub member_type: MemberType,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Member {
    pub fn new(id: MemberId, member_type: MemberType, now: Timestamp) -> Self {
        Self {
            id,
            member_type,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies an upsert to an existing member; only the type is mutable.
    pub fn apply_type(&mut self, member_type: MemberType, now: Timestamp) {
        self.member_type = member_type;
        self.updated_at = now;
    }
}
