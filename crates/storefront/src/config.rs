//! Storefront client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `STOREFRONT_API_URL` - Backend origin (default: `http://localhost:3001`)
//! - `STOREFRONT_DATA_DIR` - Directory for persisted user/cart (default: `.ny-pizza`)
//! - `STOREFRONT_ADMIN_EMAIL` - Email that gets the admin access level
//!   (default: `admin@example.com`)
//! - `STOREFRONT_HTTP_TIMEOUT_SECS` - Per-request timeout; unset means none
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use ny_pizza_core::Email;

/// Default backend origin.
pub const DEFAULT_API_URL: &str = "http://localhost:3001";

/// Default administrator email.
///
/// Access levels derived from it only gate UI; the backend authorizes
/// requests itself.
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@example.com";

/// Default data directory, relative to the working directory.
pub const DEFAULT_DATA_DIR: &str = ".ny-pizza";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Backend connection settings
    pub api: ApiConfig,
    /// Where the user and cart are persisted
    pub data_dir: PathBuf,
    /// Email granted the admin access level at login
    pub admin_email: Email,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "development")
    pub sentry_environment: Option<String>,
}

/// Backend connection settings.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Backend origin
    pub base_url: Url,
    /// Per-request timeout, if any
    pub timeout: Option<Duration>,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let base_url = Url::parse(&get_or("STOREFRONT_API_URL", DEFAULT_API_URL))
            .map_err(|e| invalid("STOREFRONT_API_URL", &e))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEnvVar(
                "STOREFRONT_API_URL".to_string(),
                format!("unsupported scheme '{}'", base_url.scheme()),
            ));
        }

        let timeout = lookup("STOREFRONT_HTTP_TIMEOUT_SECS")
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|e| invalid("STOREFRONT_HTTP_TIMEOUT_SECS", &e))
            })
            .transpose()?;

        let admin_email = Email::parse(&get_or("STOREFRONT_ADMIN_EMAIL", DEFAULT_ADMIN_EMAIL))
            .map_err(|e| invalid("STOREFRONT_ADMIN_EMAIL", &e))?;

        Ok(Self {
            api: ApiConfig { base_url, timeout },
            data_dir: PathBuf::from(get_or("STOREFRONT_DATA_DIR", DEFAULT_DATA_DIR)),
            admin_email,
            sentry_dsn: lookup("SENTRY_DSN").filter(|dsn| !dsn.is_empty()),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
        })
    }
}

fn invalid(key: &str, err: &impl std::fmt::Display) -> ConfigError {
    ConfigError::InvalidEnvVar(key.to_string(), err.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.api.base_url.as_str(), "http://localhost:3001/");
        assert_eq!(config.api.timeout, None);
        assert_eq!(config.data_dir, PathBuf::from(".ny-pizza"));
        assert_eq!(config.admin_email.as_str(), "admin@example.com");
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("STOREFRONT_API_URL", "https://api.nypizza.test/v1"),
            ("STOREFRONT_HTTP_TIMEOUT_SECS", "15"),
            ("STOREFRONT_ADMIN_EMAIL", "boss@nypizza.test"),
            ("STOREFRONT_DATA_DIR", "/tmp/pizza"),
        ])
        .unwrap();

        assert_eq!(config.api.base_url.host_str(), Some("api.nypizza.test"));
        assert_eq!(config.api.timeout, Some(Duration::from_secs(15)));
        assert_eq!(config.admin_email.as_str(), "boss@nypizza.test");
        assert_eq!(config.data_dir, PathBuf::from("/tmp/pizza"));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            load(&[("STOREFRONT_API_URL", "not a url")]),
            Err(ConfigError::InvalidEnvVar(key, _)) if key == "STOREFRONT_API_URL"
        ));
        assert!(load(&[("STOREFRONT_API_URL", "ftp://files.test")]).is_err());
        assert!(load(&[("STOREFRONT_HTTP_TIMEOUT_SECS", "soon")]).is_err());
        assert!(load(&[("STOREFRONT_ADMIN_EMAIL", "nobody")]).is_err());
    }

    #[test]
    fn test_empty_sentry_dsn_is_none() {
        let config = load(&[("SENTRY_DSN", "")]).unwrap();
        assert!(config.sentry_dsn.is_none());
    }
}
