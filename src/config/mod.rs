//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables through the
//! `config` and `dotenvy` crates. Variables use the `CAMPAIGN_INGEST` prefix
//! and `__` between nesting levels.
//!
//! # Example
//!
//! ```no_run
//! use campaign_ingest::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod database;
mod error;
mod server;
mod webhook;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, LogFormat, ServerConfig};
pub use webhook::{WebhookConfig, MIN_SHARED_SECRET_LEN};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, logging, limits)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Webhook authentication and payload interpretation
    #[serde(default)]
    pub webhook: WebhookConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Loads `.env` when present, then reads `CAMPAIGN_INGEST__*` variables:
    ///
    /// - `CAMPAIGN_INGEST__SERVER__PORT=3005` -> `server.port = 3005`
    /// - `CAMPAIGN_INGEST__WEBHOOK__AUTH_MODE=hmac` -> `webhook.auth_mode = hmac`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or a value
    /// cannot be parsed into its expected type.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CAMPAIGN_INGEST")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.webhook.validate()?;
        if self.database.acquire_timeout_secs >= self.server.request_timeout_secs {
            return Err(ValidationError::AcquireTimeoutExceedsRequest);
        }
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::webhook::AuthMode;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: [&str; 8] = [
        "CAMPAIGN_INGEST__DATABASE__URL",
        "CAMPAIGN_INGEST__DATABASE__ACQUIRE_TIMEOUT_SECS",
        "CAMPAIGN_INGEST__WEBHOOK__BEARER_TOKENS",
        "CAMPAIGN_INGEST__WEBHOOK__AUTH_MODE",
        "CAMPAIGN_INGEST__WEBHOOK__SHARED_SECRET",
        "CAMPAIGN_INGEST__SERVER__PORT",
        "CAMPAIGN_INGEST__SERVER__ENVIRONMENT",
        "CAMPAIGN_INGEST__SERVER__LOG_FORMAT",
    ];

    fn set_minimal_env() {
        env::set_var("CAMPAIGN_INGEST__DATABASE__URL", "postgresql://test@localhost/crm");
        env::set_var("CAMPAIGN_INGEST__WEBHOOK__BEARER_TOKENS", "crm:abc123");
    }

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.database.url.expose_secret(), "postgresql://test@localhost/crm");
        assert_eq!(config.webhook.auth_mode, AuthMode::Bearer);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_server_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3005);
        assert_eq!(config.server.log_format, LogFormat::Pretty);
        assert_eq!(config.webhook.signature_tolerance_secs, 300);
        assert_eq!(config.webhook.business_timezone, "Europe/Berlin");
    }

    #[test]
    fn test_hmac_mode_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("CAMPAIGN_INGEST__WEBHOOK__AUTH_MODE", "hmac");
        env::set_var("CAMPAIGN_INGEST__WEBHOOK__SHARED_SECRET", "s3cret-value");
        env::set_var("CAMPAIGN_INGEST__SERVER__LOG_FORMAT", "json");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.webhook.auth_mode, AuthMode::Hmac);
        assert_eq!(config.server.log_format, LogFormat::Json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_hmac_mode_without_secret_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("CAMPAIGN_INGEST__WEBHOOK__AUTH_MODE", "hmac");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_acquire_timeout_must_undercut_request_timeout() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("CAMPAIGN_INGEST__DATABASE__ACQUIRE_TIMEOUT_SECS", "30");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.database.acquire_timeout_secs, 30);
        assert_eq!(
            config.validate(),
            Err(ValidationError::AcquireTimeoutExceedsRequest)
        );
    }

    #[test]
    fn test_is_production() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("CAMPAIGN_INGEST__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        assert!(result.unwrap().is_production());
    }

    #[test]
    fn test_custom_server_port() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("CAMPAIGN_INGEST__SERVER__PORT", "3000");
        let result = AppConfig::load();
        clear_env();

        assert_eq!(result.unwrap().server.port, 3000);
    }
}
