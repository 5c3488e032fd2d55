//! Sync module - validated delivery payloads and processing errors.

mod attendee_payload;
mod campaign_payload;
mod errors;
mod reader;

pub use attendee_payload::{AttendeeUpsertPayload, PersonRef, ATTENDEE_EVENT_TYPE};
pub use campaign_payload::{CampaignPayload, CampaignUpsertPayload, CAMPAIGN_EVENT_TYPE};
pub use errors::{BusinessError, ErrorKind, PayloadIssue, PayloadValidationError, SyncError};
