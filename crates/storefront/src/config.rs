//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `QKART_API_ENDPOINT` - Base URL of the QKART backend
//!   (default: `https://qkart-subaga.herokuapp.com/api/v1`)
//! - `QKART_SEARCH_DEBOUNCE_MS` - Quiet period before a typed search is sent (default: 500)
//! - `QKART_SESSION_FILE` - Where the session token and username are persisted
//!   (default: `<data dir>/qkart/session.json`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Backend the storefront talks to when nothing is configured.
pub const DEFAULT_API_ENDPOINT: &str = "https://qkart-subaga.herokuapp.com/api/v1";

/// Default quiet period for search-as-you-type.
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 500;

const SESSION_FILE_NAME: &str = "session.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Could not determine a data directory; set QKART_SESSION_FILE")]
    NoDataDir,
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// QKART backend base URL (without trailing slash)
    pub api_endpoint: Url,
    /// Search-as-you-type quiet period
    pub search_debounce: Duration,
    /// Persisted session location
    pub session_file: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid, or if no
    /// session file location can be determined.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// See [`StorefrontConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_endpoint = parse_endpoint(
            "QKART_API_ENDPOINT",
            &lookup("QKART_API_ENDPOINT").unwrap_or_else(|| DEFAULT_API_ENDPOINT.to_string()),
        )?;

        let search_debounce = match lookup("QKART_SEARCH_DEBOUNCE_MS") {
            Some(raw) => raw.parse::<u64>().map(Duration::from_millis).map_err(|e| {
                ConfigError::InvalidEnvVar("QKART_SEARCH_DEBOUNCE_MS".to_string(), e.to_string())
            })?,
            None => Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS),
        };

        let session_file = match lookup("QKART_SESSION_FILE") {
            Some(path) => PathBuf::from(path),
            None => default_session_file()?,
        };

        Ok(Self {
            api_endpoint,
            search_debounce,
            session_file,
            sentry_dsn: lookup("SENTRY_DSN"),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse and validate the backend URL.
///
/// Only `http` and `https` are accepted. A trailing slash is stripped so
/// endpoint paths can be appended uniformly.
fn parse_endpoint(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim_end_matches('/'))
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{other}' (expected http or https)"),
        )),
    }
}

/// `<data dir>/qkart/session.json`.
fn default_session_file() -> Result<PathBuf, ConfigError> {
    dirs::data_dir()
        .map(|dir| dir.join("qkart").join(SESSION_FILE_NAME))
        .ok_or(ConfigError::NoDataDir)
}
