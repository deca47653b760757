//! Client configuration

use std::time::Duration;

use blueprint_core::constants::{defaults, timeouts};

/// Environment variable names
pub mod env {
    pub const API_URL: &str = "BLUEPRINT_API_URL";
    /// Name used by the browser build; read when `BLUEPRINT_API_URL` is unset
    pub const VITE_API_URL: &str = "VITE_API_URL";
    pub const REQUEST_TIMEOUT_SECS: &str = "BLUEPRINT_REQUEST_TIMEOUT_SECS";
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Relay base URL without trailing slash
    pub api_url: String,
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: defaults::RELAY_URL.to_string(),
            request_timeout: Duration::from_secs(timeouts::RELAY_REQUEST_SECS),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`.
    ///
    /// Blank values count as unset. An unparsable or zero timeout keeps the
    /// default and logs a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Self::default();

        if let Some(url) = get(env::API_URL).or_else(|| get(env::VITE_API_URL)) {
            config.api_url = url.trim_end_matches('/').to_string();
        }

        if let Some(raw) = get(env::REQUEST_TIMEOUT_SECS) {
            match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => config.request_timeout = Duration::from_secs(secs),
                _ => log::warn!(
                    "Ignoring invalid {}={:?}, using {:?}",
                    env::REQUEST_TIMEOUT_SECS,
                    raw,
                    config.request_timeout
                ),
            }
        }

        config
    }
}
