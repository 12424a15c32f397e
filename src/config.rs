//! Environment-driven dashboard configuration.

use crate::error::AppError;
use std::net::SocketAddr;
use std::time::Duration;

/// Default backend base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

/// Default address the dashboard server binds to.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Default poll interval in seconds.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

/// Default per-request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

pub const ENV_API_URL: &str = "CODESAGE_API_URL";
pub const ENV_BIND_ADDR: &str = "CODESAGE_BIND_ADDR";
pub const ENV_POLL_INTERVAL: &str = "CODESAGE_POLL_INTERVAL_SECS";
pub const ENV_REQUEST_TIMEOUT: &str = "CODESAGE_REQUEST_TIMEOUT_SECS";
pub const ENV_FAILURE_POLICY: &str = "CODESAGE_FAILURE_POLICY";

/// What a fetch cycle does when the live source fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Replace the snapshot with the demonstration dataset and hide the error.
    #[default]
    Fallback,

    /// Keep the previous snapshot on screen and surface the error.
    KeepStale,
}

impl FailurePolicy {
    fn parse(value: &str) -> Result<Self, AppError> {
        match value.trim().to_lowercase().as_str() {
            "fallback" | "demo" => Ok(Self::Fallback),
            "keep-stale" | "keep_stale" | "stale" => Ok(Self::KeepStale),
            other => Err(AppError::config(
                ENV_FAILURE_POLICY,
                format!("unknown policy '{}' (expected 'fallback' or 'keep-stale')", other),
            )),
        }
    }
}

/// Dashboard configuration.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Base URL of the review backend, including the `/api` prefix.
    pub api_url: String,

    /// Address the dashboard server listens on.
    pub bind_addr: SocketAddr,

    /// Poll interval in seconds.
    pub poll_interval_secs: u64,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Behavior when a fetch cycle fails.
    pub failure_policy: FailurePolicy,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Unset or blank variables fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(url) = get(ENV_API_URL) {
            config.api_url = url.trim().trim_end_matches('/').to_string();
        }

        if let Some(addr) = get(ENV_BIND_ADDR) {
            config.bind_addr = addr
                .trim()
                .parse()
                .map_err(|_| AppError::config(ENV_BIND_ADDR, format!("'{}' is not a socket address", addr)))?;
        }

        if let Some(secs) = get(ENV_POLL_INTERVAL) {
            config.poll_interval_secs = parse_positive_secs(ENV_POLL_INTERVAL, &secs)?;
        }

        if let Some(secs) = get(ENV_REQUEST_TIMEOUT) {
            config.request_timeout_secs = parse_positive_secs(ENV_REQUEST_TIMEOUT, &secs)?;
        }

        if let Some(policy) = get(ENV_FAILURE_POLICY) {
            config.failure_policy = FailurePolicy::parse(&policy)?;
        }

        Ok(config)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn parse_positive_secs(variable: &str, value: &str) -> Result<u64, AppError> {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(AppError::config(variable, "must be a positive integer")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = DashboardConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.api_url, "http://localhost:8080/api");
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(config.poll_interval(), Duration::from_secs(30));
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.failure_policy, FailurePolicy::Fallback);
    }

    #[test]
    fn test_api_url_override() {
        let config =
            DashboardConfig::from_lookup(lookup_from(&[(ENV_API_URL, "https://reviews.example.com/api/")]))
                .unwrap();
        assert_eq!(config.api_url, "https://reviews.example.com/api");
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = DashboardConfig::from_lookup(lookup_from(&[(ENV_API_URL, "  ")])).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_invalid_interval_rejected() {
        let err = DashboardConfig::from_lookup(lookup_from(&[(ENV_POLL_INTERVAL, "0")])).unwrap_err();
        assert!(err.to_string().contains(ENV_POLL_INTERVAL));

        let err = DashboardConfig::from_lookup(lookup_from(&[(ENV_REQUEST_TIMEOUT, "soon")])).unwrap_err();
        assert!(err.to_string().contains(ENV_REQUEST_TIMEOUT));
    }

    #[test]
    fn test_failure_policy_parsing() {
        let config =
            DashboardConfig::from_lookup(lookup_from(&[(ENV_FAILURE_POLICY, "Keep-Stale")])).unwrap();
        assert_eq!(config.failure_policy, FailurePolicy::KeepStale);

        assert!(DashboardConfig::from_lookup(lookup_from(&[(ENV_FAILURE_POLICY, "panic")])).is_err());
    }
}
