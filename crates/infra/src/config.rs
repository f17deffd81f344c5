//! Configuration loading and representation.
//!
//! Everything comes from `BUDBAR_*` environment variables. Loading goes
//! through a lookup function so tests never touch the process environment.

use core::str::FromStr;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LOG_FILTER: &str = "info";

pub const ENV_API_URL: &str = "BUDBAR_API_URL";
pub const ENV_PICKUP_ADDRESS: &str = "BUDBAR_PICKUP_ADDRESS";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "BUDBAR_HTTP_TIMEOUT_SECS";
pub const ENV_LOG_FORMAT: &str = "BUDBAR_LOG_FORMAT";
pub const ENV_LOG_FILTER: &str = "BUDBAR_LOG_FILTER";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: invalid value {value:?} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(var: &'static str, value: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            var,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
    Compact,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            "compact" | "text" => Ok(LogFormat::Compact),
            other => Err(format!("expected json, pretty or compact, got {other:?}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub format: LogFormat,
    /// Used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// REST backend base URL, without the `/api` suffix.
    pub api_url: String,
    pub pickup_address: Option<String>,
    pub http_timeout: Duration,
    pub log: LogConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            pickup_address: None,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            log: LogConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_url = match get(ENV_API_URL) {
            Some(url) => {
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(ConfigError::invalid(
                        ENV_API_URL,
                        &url,
                        "must start with http:// or https://",
                    ));
                }
                url.trim_end_matches('/').to_string()
            }
            None => {
                tracing::warn!(
                    "{ENV_API_URL} not set; using default {DEFAULT_API_URL}"
                );
                DEFAULT_API_URL.to_string()
            }
        };

        let http_timeout = match get(ENV_HTTP_TIMEOUT_SECS) {
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|_| {
                    ConfigError::invalid(ENV_HTTP_TIMEOUT_SECS, &raw, "expected whole seconds")
                })?;
                if secs == 0 {
                    return Err(ConfigError::invalid(
                        ENV_HTTP_TIMEOUT_SECS,
                        &raw,
                        "must be at least 1",
                    ));
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        let format = match get(ENV_LOG_FORMAT) {
            Some(raw) => raw
                .parse()
                .map_err(|reason: String| ConfigError::invalid(ENV_LOG_FORMAT, &raw, reason))?,
            None => LogFormat::default(),
        };

        Ok(Self {
            api_url,
            pickup_address: get(ENV_PICKUP_ADDRESS),
            http_timeout,
            log: LogConfig {
                format,
                filter: get(ENV_LOG_FILTER).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            },
        })
    }
}
