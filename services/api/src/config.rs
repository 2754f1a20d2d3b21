//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use chrono::{Duration, Utc};
use std::net::SocketAddr;
use tracing::Level;

pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub log_level: Level,
    pub cors_origin: String,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    /// Optional at startup. A missing key fails each generation call instead.
    pub gemini_api_key: Option<String>,
    pub gemini_api_url: String,
    pub gemini_model: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bind_address", &self.bind_address)
            .field("log_level", &self.log_level)
            .field("cors_origin", &self.cors_origin)
            .field("token_ttl_hours", &self.token_ttl_hours)
            .field("gemini_api_key", &self.gemini_api_key.as_ref().map(|_| "[REDACTED]"))
            .field("gemini_api_url", &self.gemini_api_url)
            .field("gemini_model", &self.gemini_model)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var_or = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());
        let required = |name: &str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingVar(name.to_string()))
        };

        // --- Load Server and Database Settings ---
        let bind_address_str = var_or("BIND_ADDRESS", "0.0.0.0:4001");
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let database_url = required("DATABASE_URL")?;

        let log_level_str = var_or("RUST_LOG", "INFO");
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let cors_origin = var_or("CORS_ORIGIN", "http://localhost:3000");

        // --- Load Auth Settings ---
        let jwt_secret = required("JWT_SECRET")?;

        let ttl_str = var_or("TOKEN_TTL_HOURS", "24");
        let token_ttl_hours = ttl_str
            .parse::<i64>()
            .ok()
            .filter(|hours| *hours > 0)
            // Expiry timestamps must stay representable.
            .filter(|hours| {
                Duration::try_hours(*hours)
                    .and_then(|ttl| Utc::now().checked_add_signed(ttl))
                    .is_some()
            })
            .ok_or_else(|| {
                ConfigError::InvalidValue(
                    "TOKEN_TTL_HOURS".to_string(),
                    format!("'{}' is not a usable positive number of hours", ttl_str),
                )
            })?;

        // --- Load Upstream Settings (key is optional) ---
        let gemini_api_key = lookup("GEMINI_API_KEY").filter(|key| !key.trim().is_empty());
        let gemini_api_url = var_or("GEMINI_API_URL", DEFAULT_GEMINI_API_URL);
        let gemini_model = var_or("GEMINI_MODEL", DEFAULT_GEMINI_MODEL);

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            cors_origin,
            jwt_secret,
            token_ttl_hours,
            gemini_api_key,
            gemini_api_url,
            gemini_model,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    const MINIMAL: [(&str, &str); 2] = [
        ("DATABASE_URL", "postgres://localhost/teaching"),
        ("JWT_SECRET", "secret"),
    ];

    #[test]
    fn minimal_environment_uses_defaults() {
        let config = Config::from_lookup(lookup_from(&MINIMAL)).unwrap();

        assert_eq!(config.bind_address, "0.0.0.0:4001".parse::<SocketAddr>().unwrap());
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.token_ttl_hours, 24);
        assert_eq!(config.gemini_api_key, None);
        assert_eq!(config.gemini_api_url, DEFAULT_GEMINI_API_URL);
        assert_eq!(config.gemini_model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.cors_origin, "http://localhost:3000");
    }

    #[test]
    fn database_url_is_required() {
        let err = Config::from_lookup(lookup_from(&[("JWT_SECRET", "secret")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(name) if name == "DATABASE_URL"));
    }

    #[test]
    fn jwt_secret_is_required() {
        let err = Config::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://x")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(name) if name == "JWT_SECRET"));
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let mut vars = MINIMAL.to_vec();
        vars.push(("GEMINI_API_KEY", "  "));
        let config = Config::from_lookup(lookup_from(&vars)).unwrap();
        assert_eq!(config.gemini_api_key, None);
    }

    #[test]
    fn invalid_values_are_rejected() {
        for (name, value) in [
            ("BIND_ADDRESS", "not-an-address"),
            ("RUST_LOG", "loud"),
            ("TOKEN_TTL_HOURS", "0"),
            ("TOKEN_TTL_HOURS", "9223372036854775807"),
            ("TOKEN_TTL_HOURS", "2562047788015"),
        ] {
            let mut vars = MINIMAL.to_vec();
            vars.push((name, value));
            let err = Config::from_lookup(lookup_from(&vars)).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue(ref var, _) if var == name));
        }
    }

    #[test]
    fn debug_output_hides_the_api_key() {
        let mut vars = MINIMAL.to_vec();
        vars.push(("GEMINI_API_KEY", "super-secret-key"));
        let config = Config::from_lookup(lookup_from(&vars)).unwrap();
        assert!(!format!("{:?}", config).contains("super-secret-key"));
    }
}
