//! Campaign module - the Event projection of CRM campaigns.

mod event;

pub use event::{Event, EventStatus, EventUpsert, GeoPoint, Venue};
