//! Adapters - Implementations of port interfaces.
//!
//! - `http` - axum routes, handlers and middleware
//! - `postgres` - sqlx-backed record stores
//! - `memory` - in-process record stores for tests and embedding
//! - `sanitizer` - ammonia-backed HTML sanitizer

pub mod http;
pub mod memory;
pub mod postgres;
pub mod sanitizer;
