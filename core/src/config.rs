//! Client configuration loaded from environment variables.
//!
//! ## Variables
//!
//! - `BITLY_API_URL` - API base URL (default: `http://api.bit.ly/v3`)
//! - `BITLY_TIMEOUT_SECS` - Transport timeout in seconds, at least 1 (default: 30)
//! - `BITLY_LOGIN` / `BITLY_API_KEY` - Account credentials, read by
//!   `Credentials::from_env`
//!
//! The `from_lookup` constructors take the variable source as a function so
//! parsing can be exercised without mutating the process environment.

use std::env;
use std::time::Duration;

use crate::error::ConfigError;
use crate::types::Credentials;

pub const DEFAULT_API_URL: &str = "http://api.bit.ly/v3";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Where and how to reach the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Config {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(url) = lookup("BITLY_API_URL").filter(|v| !v.trim().is_empty()) {
            config.api_url = url.trim().to_string();
        }
        if let Some(raw) = lookup("BITLY_TIMEOUT_SECS") {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::Invalid {
                    name: "BITLY_TIMEOUT_SECS",
                    value: raw.clone(),
                })?;
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }
}

impl Credentials {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let login = lookup("BITLY_LOGIN").ok_or(ConfigError::Missing("BITLY_LOGIN"))?;
        let api_key = lookup("BITLY_API_KEY").ok_or(ConfigError::Missing("BITLY_API_KEY"))?;
        Ok(Credentials::new(login, api_key))
    }
}
