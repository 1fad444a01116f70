//! CRM gateway configuration.
//!
//! The bearer token is injected from the environment at startup and held
//! as a `SecretString`; it never appears in Debug output or logs.

use parley_core::ConfigError;
use secrecy::SecretString;
use std::time::Duration;

/// Default Capsule API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.capsulecrm.com/api/v2";

const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Configuration for the CRM gateway client.
#[derive(Clone)]
pub struct CrmConfig {
    /// Base URL of the CRM REST API, without trailing slash.
    pub base_url: String,

    /// Static bearer token, supplied out of band.
    pub token: SecretString,

    /// Transport-level request timeout.
    pub timeout: Duration,

    /// Tuning for the case visibility poll.
    pub visibility: VisibilityConfig,
}

/// Bounded read-poll tuning for [`crate::wait_until_visible`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityConfig {
    /// Maximum number of read attempts before giving up.
    pub attempts: u32,

    /// Fixed delay between attempts.
    pub backoff: Duration,
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            attempts: 5,
            backoff: Duration::from_millis(200),
        }
    }
}

impl CrmConfig {
    /// Create a config with defaults for everything but the credentials.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: trim_base_url(base_url.into()),
            token: SecretString::from(token.into()),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            visibility: VisibilityConfig::default(),
        }
    }

    /// Create CrmConfig from environment variables.
    ///
    /// Environment variables:
    /// - `PARLEY_CRM_TOKEN`: Bearer token (required)
    /// - `PARLEY_CRM_BASE_URL`: API base URL (default: Capsule v2)
    /// - `PARLEY_CRM_TIMEOUT_MS`: Request timeout (default: 10000)
    /// - `PARLEY_CRM_VISIBILITY_ATTEMPTS`: Poll attempts (default: 5)
    /// - `PARLEY_CRM_VISIBILITY_BACKOFF_MS`: Poll backoff (default: 200)
    pub fn from_env() -> Result<Self, ConfigError> {
        let token = std::env::var("PARLEY_CRM_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingRequired {
                field: "PARLEY_CRM_TOKEN".to_string(),
            })?;

        let base_url = std::env::var("PARLEY_CRM_BASE_URL")
            .ok()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_ms = parse_env_u64("PARLEY_CRM_TIMEOUT_MS", DEFAULT_TIMEOUT_MS)?;

        let defaults = VisibilityConfig::default();
        let attempts = parse_env_u64("PARLEY_CRM_VISIBILITY_ATTEMPTS", defaults.attempts as u64)?;
        let backoff_ms = parse_env_u64(
            "PARLEY_CRM_VISIBILITY_BACKOFF_MS",
            defaults.backoff.as_millis() as u64,
        )?;

        if attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "PARLEY_CRM_VISIBILITY_ATTEMPTS".to_string(),
                value: "0".to_string(),
                reason: "must be > 0".to_string(),
            });
        }

        Ok(Self {
            base_url: trim_base_url(base_url),
            token: SecretString::from(token),
            timeout: Duration::from_millis(timeout_ms),
            visibility: VisibilityConfig {
                attempts: attempts as u32,
                backoff: Duration::from_millis(backoff_ms),
            },
        })
    }
}

impl std::fmt::Debug for CrmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrmConfig")
            .field("base_url", &self.base_url)
            .field("token", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .field("visibility", &self.visibility)
            .finish()
    }
}

fn trim_base_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
            field: name.to_string(),
            value: raw,
            reason: "must be a non-negative integer".to_string(),
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_trailing_slash() {
        let config = CrmConfig::new("https://crm.example.com/api/v2/", "secret");
        assert_eq!(config.base_url, "https://crm.example.com/api/v2");
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = CrmConfig::new(DEFAULT_BASE_URL, "super-secret-token");
        let debug = format!("{:?}", config);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("super-secret-token"));
    }

    #[test]
    fn test_visibility_defaults() {
        let defaults = VisibilityConfig::default();
        assert_eq!(defaults.attempts, 5);
        assert_eq!(defaults.backoff, Duration::from_millis(200));
    }
}
