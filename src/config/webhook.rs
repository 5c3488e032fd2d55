//! Webhook authentication configuration

use std::collections::HashSet;

use chrono_tz::Tz;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::webhook::{AuthMode, BearerToken, WebhookVerifier, DEFAULT_TOLERANCE_SECS};

/// Minimum length of the HMAC shared secret.
pub const MIN_SHARED_SECRET_LEN: usize = 8;

/// Webhook configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookConfig {
    /// Which scheme the webhook routes enforce
    #[serde(default)]
    pub auth_mode: AuthMode,

    /// HMAC shared secret (required in hmac mode)
    pub shared_secret: Option<SecretString>,

    /// Bearer tokens as `label:token,token2,...`
    pub bearer_tokens: Option<SecretString>,

    /// Accepted clock skew for signed deliveries, in seconds
    #[serde(default = "default_tolerance")]
    pub signature_tolerance_secs: u64,

    /// IANA zone that campaign schedules are interpreted in
    #[serde(default = "default_business_timezone")]
    pub business_timezone: String,
}

impl WebhookConfig {
    /// Parses the bearer token list.
    ///
    /// `label:token` entries carry a source label; a bare `token` has none.
    /// The label is everything before the first `:`.
    pub fn parse_bearer_tokens(&self) -> Result<Vec<BearerToken>, ValidationError> {
        let Some(raw) = &self.bearer_tokens else {
            return Ok(Vec::new());
        };

        let mut seen = HashSet::new();
        let mut tokens = Vec::new();
        for (index, entry) in raw
            .expose_secret()
            .split(',')
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .enumerate()
        {
            let (label, token) = match entry.split_once(':') {
                Some((label, token)) => {
                    let label = label.trim();
                    ((!label.is_empty()).then(|| label.to_string()), token.trim())
                }
                None => (None, entry),
            };

            if token.is_empty() {
                return Err(ValidationError::EmptyBearerToken(index));
            }
            if !seen.insert(token) {
                return Err(ValidationError::DuplicateBearerToken(index));
            }

            tokens.push(BearerToken {
                token: SecretString::new(token.to_string()),
                source: label,
            });
        }
        Ok(tokens)
    }

    /// Resolves the business timezone.
    pub fn business_tz(&self) -> Result<Tz, ValidationError> {
        self.business_timezone
            .parse::<Tz>()
            .map_err(|_| ValidationError::InvalidTimezone(self.business_timezone.clone()))
    }

    /// Builds the verifier for the configured mode.
    pub fn build_verifier(&self) -> Result<WebhookVerifier, ValidationError> {
        match self.auth_mode {
            AuthMode::Bearer => {
                let tokens = self.parse_bearer_tokens()?;
                if tokens.is_empty() {
                    return Err(ValidationError::NoBearerTokens);
                }
                Ok(WebhookVerifier::bearer(&tokens))
            }
            AuthMode::Hmac => {
                let secret = self.checked_secret()?;
                Ok(WebhookVerifier::hmac(
                    SecretString::new(secret.to_string()),
                    self.signature_tolerance_secs,
                ))
            }
        }
    }

    fn checked_secret(&self) -> Result<&str, ValidationError> {
        let secret = self
            .shared_secret
            .as_ref()
            .map(|s| s.expose_secret().as_str())
            .filter(|s| !s.is_empty())
            .ok_or(ValidationError::MissingRequired(
                "CAMPAIGN_INGEST__WEBHOOK__SHARED_SECRET",
            ))?;
        if secret.len() < MIN_SHARED_SECRET_LEN {
            return Err(ValidationError::SharedSecretTooShort(MIN_SHARED_SECRET_LEN));
        }
        Ok(secret)
    }

    /// Validate webhook configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.signature_tolerance_secs == 0 {
            return Err(ValidationError::InvalidSignatureTolerance);
        }
        self.business_tz()?;
        self.build_verifier().map(|_| ())
    }
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            auth_mode: AuthMode::default(),
            shared_secret: None,
            bearer_tokens: None,
            signature_tolerance_secs: default_tolerance(),
            business_timezone: default_business_timezone(),
        }
    }
}

fn default_tolerance() -> u64 {
    DEFAULT_TOLERANCE_SECS
}

fn default_business_timezone() -> String {
    "Europe/Berlin".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bearer(tokens: &str) -> WebhookConfig {
        WebhookConfig {
            bearer_tokens: Some(SecretString::new(tokens.to_string())),
            ..Default::default()
        }
    }

    fn hmac(secret: &str) -> WebhookConfig {
        WebhookConfig {
            auth_mode: AuthMode::Hmac,
            shared_secret: Some(SecretString::new(secret.to_string())),
            ..Default::default()
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Bearer token list
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn labelled_and_bare_tokens_are_parsed() {
        let tokens = bearer("crm:abc, backup:def:ghi ,xyz").parse_bearer_tokens().unwrap();

        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].source.as_deref(), Some("crm"));
        assert_eq!(tokens[0].token.expose_secret(), "abc");
        assert_eq!(tokens[1].source.as_deref(), Some("backup"));
        assert_eq!(tokens[1].token.expose_secret(), "def:ghi");
        assert!(tokens[2].source.is_none());
        assert_eq!(tokens[2].token.expose_secret(), "xyz");
    }

    #[test]
    fn empty_token_is_rejected() {
        let result = bearer("crm:abc,other:").parse_bearer_tokens();
        assert_eq!(result.unwrap_err(), ValidationError::EmptyBearerToken(1));
    }

    #[test]
    fn duplicate_token_is_rejected() {
        let result = bearer("a:abc,b:abc").parse_bearer_tokens();
        assert_eq!(result.unwrap_err(), ValidationError::DuplicateBearerToken(1));
    }

    #[test]
    fn bearer_mode_requires_a_token() {
        let config = WebhookConfig::default();
        assert_eq!(config.validate(), Err(ValidationError::NoBearerTokens));
        assert!(bearer("abc").validate().is_ok());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // HMAC mode
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn hmac_mode_requires_secret() {
        let config = WebhookConfig {
            auth_mode: AuthMode::Hmac,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingRequired(_))
        ));
    }

    #[test]
    fn short_secret_is_rejected() {
        assert_eq!(
            hmac("short").validate(),
            Err(ValidationError::SharedSecretTooShort(MIN_SHARED_SECRET_LEN))
        );
    }

    #[test]
    fn hmac_verifier_is_built() {
        let verifier = hmac("s3cret-value").build_verifier().unwrap();
        assert_eq!(verifier.mode(), AuthMode::Hmac);
        assert!(verifier.needs_raw_body());
    }

    #[test]
    fn zero_tolerance_is_rejected() {
        let config = WebhookConfig {
            signature_tolerance_secs: 0,
            ..hmac("s3cret-value")
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidSignatureTolerance));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Business timezone
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn default_timezone_is_berlin() {
        let config = WebhookConfig::default();
        assert_eq!(config.business_tz().unwrap(), chrono_tz::Europe::Berlin);
    }

    #[test]
    fn unknown_timezone_is_rejected() {
        let config = WebhookConfig {
            business_timezone: "Mars/Olympus".to_string(),
            ..bearer("abc")
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidTimezone("Mars/Olympus".to_string()))
        );
    }
}
