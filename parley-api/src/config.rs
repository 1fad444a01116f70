//! API Configuration Module
//!
//! CORS and bind settings for the relay. Configuration is loaded from
//! environment variables with sensible defaults for development.

// ============================================================================
// API CONFIGURATION
// ============================================================================

/// API configuration for CORS and bind settings.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Allowed CORS origins (comma-separated in env var).
    /// Empty means allow all origins (dev mode).
    pub cors_origins: Vec<String>,

    /// Max age for CORS preflight cache in seconds.
    pub cors_max_age_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            // CORS defaults: permissive for development
            cors_origins: Vec::new(), // Empty = allow all
            cors_max_age_secs: 86400, // 24 hours
        }
    }
}

impl ApiConfig {
    /// Create ApiConfig from environment variables.
    ///
    /// Environment variables:
    /// - `PARLEY_CORS_ORIGINS`: Comma-separated allowed origins (empty = allow all)
    /// - `PARLEY_CORS_MAX_AGE_SECS`: Preflight cache duration (default: 86400)
    pub fn from_env() -> Self {
        let cors_origins = std::env::var("PARLEY_CORS_ORIGINS")
            .ok()
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let cors_max_age_secs = std::env::var("PARLEY_CORS_MAX_AGE_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(86400);

        Self {
            cors_origins,
            cors_max_age_secs,
        }
    }

    /// Check if running in production mode (strict CORS).
    pub fn is_production(&self) -> bool {
        !self.cors_origins.is_empty()
    }

    /// Check if a given origin is allowed.
    pub fn is_origin_allowed(&self, origin: &str) -> bool {
        if self.cors_origins.is_empty() {
            // Dev mode: allow all
            return true;
        }

        self.cors_origins.iter().any(|allowed| allowed == origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert!(config.cors_origins.is_empty());
        assert_eq!(config.cors_max_age_secs, 86400);
        assert!(!config.is_production());
    }

    #[test]
    fn test_origin_allowed_dev_mode() {
        let config = ApiConfig::default();
        assert!(config.is_origin_allowed("https://anything.example"));
        assert!(config.is_origin_allowed("http://localhost:3000"));
    }

    #[test]
    fn test_origin_allowed_production() {
        let mut config = ApiConfig::default();
        config.cors_origins = vec!["https://app.parley.run".to_string()];

        assert!(config.is_production());
        assert!(config.is_origin_allowed("https://app.parley.run"));
        assert!(!config.is_origin_allowed("https://evil.example"));
    }
}
