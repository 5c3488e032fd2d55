//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid listen address")]
    InvalidAddress,

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid body size limit")]
    InvalidBodyLimit,

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool max_connections must be positive and at least min_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed ({0})")]
    PoolSizeTooLarge(u32),

    #[error("Pool acquire timeout must be greater than zero")]
    InvalidAcquireTimeout,

    #[error("Pool acquire timeout must be shorter than the request timeout")]
    AcquireTimeoutExceedsRequest,

    #[error("Webhook shared secret must be at least {0} characters")]
    SharedSecretTooShort(usize),

    #[error("Bearer token entry {0} has an empty token")]
    EmptyBearerToken(usize),

    #[error("Bearer token entry {0} duplicates an earlier token")]
    DuplicateBearerToken(usize),

    #[error("Bearer auth mode requires at least one bearer token")]
    NoBearerTokens,

    #[error("Signature tolerance must be greater than zero")]
    InvalidSignatureTolerance,

    #[error("Unknown business timezone: {0}")]
    InvalidTimezone(String),
}
