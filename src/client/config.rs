//! Client configuration.
//!
//! | Field | Default | Environment variable |
//! |-------|---------|----------------------|
//! | `base_url` | `http://localhost:5000/api` | `INVOICE_API_URL` |
//! | `timeout_ms` | 15000 | `INVOICE_API_TIMEOUT_MS` |
//! | `max_retries` | 2 | `INVOICE_API_MAX_RETRIES` |
//! | `backoff_base_ms` | 250 | |
//! | `backoff_ceiling_ms` | 3000 | |
//! | `locale` | `lt` | `INVOICE_API_LOCALE` |
//! | `enable_logging` | `true` | |
//! | `proxy_url` | none | |
//! | `max_idle_connections` | 16 | |

use crate::error::ConfigError;
use crate::protocol::constants::{
    DEFAULT_BACKOFF_BASE_MS, DEFAULT_BACKOFF_CEILING_MS, DEFAULT_BASE_URL, DEFAULT_MAX_RETRIES,
    DEFAULT_TIMEOUT_MS,
};
use crate::protocol::Locale;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Base URL variable.
pub const ENV_BASE_URL: &str = "INVOICE_API_URL";
/// Timeout variable, in milliseconds.
pub const ENV_TIMEOUT_MS: &str = "INVOICE_API_TIMEOUT_MS";
/// Retry count variable.
pub const ENV_MAX_RETRIES: &str = "INVOICE_API_MAX_RETRIES";
/// Message locale variable (`lt` or `en`).
pub const ENV_LOCALE: &str = "INVOICE_API_LOCALE";

/// Configuration for [`ApiClient`](crate::ApiClient).
///
/// # Examples
///
/// ```
/// use invoice_api::ClientConfig;
///
/// let config = ClientConfig {
///     base_url: "https://invoices.example.com/api".to_string(),
///     max_retries: 5,
///     ..Default::default()
/// };
/// assert_eq!(config.timeout_ms, 15_000);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base that relative endpoints are resolved against.
    pub base_url: String,
    /// Default per-attempt timeout in milliseconds.
    pub timeout_ms: u64,
    /// Default retries after the first attempt.
    pub max_retries: u32,
    /// First backoff delay in milliseconds.
    pub backoff_base_ms: u64,
    /// Upper bound on any backoff delay in milliseconds.
    pub backoff_ceiling_ms: u64,
    /// Language of error messages.
    pub locale: Locale,
    /// Log retries through `tracing`.
    pub enable_logging: bool,
    /// Proxy for all traffic, if any.
    pub proxy_url: Option<String>,
    /// Idle connections kept per host.
    pub max_idle_connections: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_base_ms: DEFAULT_BACKOFF_BASE_MS,
            backoff_ceiling_ms: DEFAULT_BACKOFF_CEILING_MS,
            locale: Locale::default(),
            enable_logging: true,
            proxy_url: None,
            max_idle_connections: 16,
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by any `INVOICE_API_*` variables that are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when a variable is set but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = ClientConfig::default();

        if let Ok(url) = env::var(ENV_BASE_URL) {
            config.base_url = url;
        }
        if let Some(timeout) = parse_var(ENV_TIMEOUT_MS)? {
            config.timeout_ms = timeout;
        }
        if let Some(retries) = parse_var(ENV_MAX_RETRIES)? {
            config.max_retries = retries;
        }
        if let Some(locale) = parse_var(ENV_LOCALE)? {
            config.locale = locale;
        }

        Ok(config)
    }

    /// Replace the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Default per-attempt timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn parse_var<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map(Some).map_err(|e: T::Err| ConfigError::Parse {
            key: key.to_string(),
            details: e.to_string(),
        }),
        Err(_) => Ok(None),
    }
}
