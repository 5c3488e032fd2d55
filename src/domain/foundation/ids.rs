//! Strongly-typed identifier value objects.
//!
//! Internal identifiers (`EventId`, `RegistrationId`, `DeliveryId`) are UUIDs
//! minted by this service. External identifiers (`CampaignId`, `MemberId`) are
//! assigned by the upstream CRM and act as merge keys; they are never parsed,
//! only required to be non-blank.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

macro_rules! external_id {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates an identifier, rejecting blank values.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err(ValidationError::empty_field($field));
                }
                Ok(Self(id))
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_id!(
    /// Internal primary key of an Event projection.
    EventId
);

uuid_id!(
    /// Internal primary key of a Registration.
    RegistrationId
);

uuid_id!(
    /// Internal primary key of a ledger row.
    DeliveryId
);

external_id!(
    /// CRM campaign identifier, the merge key for events.
    CampaignId,
    "campaign_id"
);

external_id!(
    /// CRM person identifier (contact or lead), the primary key for members.
    MemberId,
    "person_id"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_id_generates_unique_values() {
        let id1 = EventId::new();
        let id2 = EventId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn delivery_id_from_uuid_preserves_value() {
        let uuid = Uuid::new_v4();
        let id = DeliveryId::from_uuid(uuid);
        assert_eq!(id.as_uuid(), &uuid);
    }

    #[test]
    fn registration_id_parses_from_string() {
        let uuid = Uuid::new_v4();
        let id: RegistrationId = uuid.to_string().parse().unwrap();
        assert_eq!(id.as_uuid(), &uuid);
    }

    #[test]
    fn campaign_id_rejects_blank() {
        assert!(CampaignId::new("").is_err());
        assert!(CampaignId::new("   ").is_err());
    }

    #[test]
    fn campaign_id_keeps_value_verbatim() {
        let id = CampaignId::new("701Qy00000AbCdE").unwrap();
        assert_eq!(id.as_str(), "701Qy00000AbCdE");
        assert_eq!(id.to_string(), "701Qy00000AbCdE");
    }

    #[test]
    fn member_id_rejects_blank() {
        let err = MemberId::new("").unwrap_err();
        assert_eq!(err, ValidationError::empty_field("person_id"));
    }

    #[test]
    fn external_id_serializes_transparently() {
        let id = MemberId::new("003ABC").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"003ABC\"");
    }
}
