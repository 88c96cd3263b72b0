use std::str::FromStr;

use foodgram_core::short_code::{DEFAULT_MIN_LENGTH, MAX_CODE_LENGTH};

use crate::auth::jwt::JwtConfig;

/// A missing or malformed environment variable.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set in the environment")]
    Missing(&'static str),

    #[error("{name} has an invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Server configuration loaded from environment variables.
///
/// All optional fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub database_url: String,
    /// Origin used to build absolute short links and redirect targets,
    /// without a trailing slash.
    pub public_base_url: String,
    pub short_link: ShortLinkConfig,
    pub jwt: JwtConfig,
}

/// Parameters of the recipe short-code codec.
#[derive(Debug, Clone)]
pub struct ShortLinkConfig {
    pub salt: String,
    pub min_length: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                 |
    /// |-------------------------|-------------------------|
    /// | `HOST`                  | `0.0.0.0`               |
    /// | `PORT`                  | `8000`                  |
    /// | `CORS_ORIGINS`          | `http://localhost:3000` |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                    |
    /// | `DATABASE_URL`          | required                |
    /// | `PUBLIC_BASE_URL`       | `http://localhost:8000` |
    /// | `SHORT_LINK_SALT`       | required                |
    /// | `SHORT_LINK_MIN_LENGTH` | `5` (at most 32)        |
    ///
    /// JWT settings are documented on [`JwtConfig::from_env`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = var_or("HOST", "0.0.0.0");
        let port = parse_var("PORT", 8000u16)?;

        let cors_origins: Vec<String> = var_or("CORS_ORIGINS", "http://localhost:3000")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs = parse_var("REQUEST_TIMEOUT_SECS", 30u64)?;
        let database_url = require("DATABASE_URL")?;
        let public_base_url = var_or("PUBLIC_BASE_URL", "http://localhost:8000")
            .trim_end_matches('/')
            .to_string();

        let short_link = ShortLinkConfig {
            salt: require("SHORT_LINK_SALT")?,
            min_length: check_code_length(parse_var(
                "SHORT_LINK_MIN_LENGTH",
                DEFAULT_MIN_LENGTH,
            )?)?,
        };

        let jwt = JwtConfig::from_env()?;

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            database_url,
            public_base_url,
            short_link,
            jwt,
        })
    }
}

/// Read `name`, falling back to `default` when unset.
pub(crate) fn var_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Read a required, non-empty variable.
pub(crate) fn require(name: &'static str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(name)),
    }
}

/// Parse `name` into `T`, using `default` when unset.
pub(crate) fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value.trim().parse().map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}

/// Codes longer than the stored column would make every recipe insert fail.
fn check_code_length(min_length: usize) -> Result<usize, ConfigError> {
    if min_length > MAX_CODE_LENGTH {
        return Err(ConfigError::Invalid {
            name: "SHORT_LINK_MIN_LENGTH",
            value: min_length.to_string(),
        });
    }
    Ok(min_length)
}
