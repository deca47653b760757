//! Relay configuration from the environment
//!
//! Every setting has a default except the provider API key, whose absence is
//! a startup error rather than a failure on the first request.

use std::fmt;
use std::time::Duration;

use blueprint_core::constants::{defaults, ports, timeouts};

/// Environment variable names
pub mod env {
    pub const PORT: &str = "PORT";
    pub const FRONTEND_URL: &str = "FRONTEND_URL";
    pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
    pub const GEMINI_MODEL: &str = "GEMINI_MODEL";
    pub const GEMINI_API_BASE: &str = "GEMINI_API_BASE";
    pub const REQUEST_TIMEOUT_SECS: &str = "RELAY_REQUEST_TIMEOUT_SECS";
}

/// Configuration errors detected at startup
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("GEMINI_API_KEY is not set; the relay cannot reach the image model without it")]
    MissingApiKey,

    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Settings for the Gemini image provider
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    /// Model id, e.g. "gemini-2.5-flash-image-preview"
    pub model: String,
    /// API base URL without trailing slash
    pub api_base: String,
    /// Timeout for one upstream request
    pub request_timeout: Duration,
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Full relay configuration
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Listen port
    pub port: u16,
    /// Allowed CORS origin; any origin when unset
    pub frontend_url: Option<String>,
    pub gemini: GeminiConfig,
}

impl RelayConfig {
    /// Read configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = get(env::GEMINI_API_KEY).ok_or(ConfigError::MissingApiKey)?;

        let port = match get(env::PORT) {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: env::PORT,
                value: raw,
            })?,
            None => ports::RELAY,
        };

        let request_timeout = match get(env::REQUEST_TIMEOUT_SECS) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::Invalid {
                        name: env::REQUEST_TIMEOUT_SECS,
                        value: raw,
                    })
                }
            },
            None => Duration::from_secs(timeouts::PROVIDER_REQUEST_SECS),
        };

        Ok(Self {
            port,
            frontend_url: get(env::FRONTEND_URL).filter(|url| url != "*"),
            gemini: GeminiConfig {
                api_key,
                model: get(env::GEMINI_MODEL).unwrap_or_else(|| defaults::GEMINI_MODEL.to_string()),
                api_base: get(env::GEMINI_API_BASE)
                    .map(|base| base.trim_end_matches('/').to_string())
                    .unwrap_or_else(|| defaults::GEMINI_API_BASE.to_string()),
                request_timeout,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<RelayConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RelayConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        assert!(matches!(config_from(&[]), Err(ConfigError::MissingApiKey)));
        assert!(matches!(
            config_from(&[(env::GEMINI_API_KEY, "   ")]),
            Err(ConfigError::MissingApiKey)
        ));
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[(env::GEMINI_API_KEY, "key")]).unwrap();
        assert_eq!(config.port, 3001);
        assert!(config.frontend_url.is_none());
        assert_eq!(config.gemini.model, defaults::GEMINI_MODEL);
        assert_eq!(config.gemini.api_base, defaults::GEMINI_API_BASE);
        assert_eq!(
            config.gemini.request_timeout,
            Duration::from_secs(timeouts::PROVIDER_REQUEST_SECS)
        );
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            (env::GEMINI_API_KEY, "key"),
            (env::PORT, "8088"),
            (env::FRONTEND_URL, "https://blueprint.example"),
            (env::GEMINI_MODEL, "gemini-test"),
            (env::GEMINI_API_BASE, "http://127.0.0.1:9000/v1beta/"),
            (env::REQUEST_TIMEOUT_SECS, "7"),
        ])
        .unwrap();
        assert_eq!(config.port, 8088);
        assert_eq!(config.frontend_url.as_deref(), Some("https://blueprint.example"));
        assert_eq!(config.gemini.model, "gemini-test");
        assert_eq!(config.gemini.api_base, "http://127.0.0.1:9000/v1beta");
        assert_eq!(config.gemini.request_timeout, Duration::from_secs(7));
    }

    #[test]
    fn test_wildcard_origin_means_any() {
        let config = config_from(&[(env::GEMINI_API_KEY, "key"), (env::FRONTEND_URL, "*")]).unwrap();
        assert!(config.frontend_url.is_none());
    }

    #[test]
    fn test_invalid_numbers() {
        assert!(matches!(
            config_from(&[(env::GEMINI_API_KEY, "key"), (env::PORT, "http")]),
            Err(ConfigError::Invalid { name: "PORT", .. })
        ));
        assert!(matches!(
            config_from(&[(env::GEMINI_API_KEY, "key"), (env::REQUEST_TIMEOUT_SECS, "0")]),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = config_from(&[(env::GEMINI_API_KEY, "super-secret")]).unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
