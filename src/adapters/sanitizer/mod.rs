//! HTML sanitizer adapters.

mod ammonia_sanitizer;

pub use ammonia_sanitizer::AmmoniaSanitizer;
