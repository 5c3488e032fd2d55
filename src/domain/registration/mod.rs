//! Registration module - members, registrations and status normalization.

mod member;
#[allow(clippy::module_inception)]
mod registration;
mod status;

pub use member::{Member, MemberType};
pub use registration::{BookingRefs, Registration, RegistrationUpsert, RegistrationWithEvent};
pub use status::{normalize_status, parse_check_in, RegistrationStatus};
