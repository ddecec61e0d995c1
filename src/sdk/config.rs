use anyhow::{Context, Result};
use std::{env, num::NonZeroU32, str::FromStr, time::Duration};

use super::routing::retry::RetryPolicy;

pub const DEFAULT_OSRM_URL: &str = "https://router.project-osrm.org";

#[derive(Debug, Clone)]
pub struct RouterConfig {
    pub base_url: String,
    pub profile: String,
    pub debounce: Duration,
    pub retry: RetryPolicy,
    pub request_timeout: Duration,
    pub requests_per_minute: NonZeroU32,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OSRM_URL.to_string(),
            profile: "driving".to_string(),
            debounce: Duration::from_millis(500),
            retry: RetryPolicy::default(),
            request_timeout: Duration::from_secs(15),
            requests_per_minute: NonZeroU32::MIN.saturating_add(59),
        }
    }
}

impl RouterConfig {
    /// Reads overrides from the environment, keeping defaults for unset keys.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let retry = RetryPolicy {
            max_attempts: parse_var("ROUTE_MAX_ATTEMPTS")?.unwrap_or(defaults.retry.max_attempts),
            initial_backoff: parse_var("ROUTE_INITIAL_BACKOFF_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.retry.initial_backoff),
        };
        anyhow::ensure!(retry.max_attempts > 0, "ROUTE_MAX_ATTEMPTS must be at least 1");

        Ok(Self {
            base_url: env::var("OSRM_BASE_URL").unwrap_or(defaults.base_url),
            profile: env::var("OSRM_PROFILE").unwrap_or(defaults.profile),
            debounce: parse_var("ROUTE_DEBOUNCE_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.debounce),
            retry,
            request_timeout: parse_var("ROUTE_REQUEST_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            requests_per_minute: parse_var("OSRM_REQUESTS_PER_MINUTE")?
                .unwrap_or(defaults.requests_per_minute),
        })
    }
}

fn parse_var<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("Invalid value for {}: {:?}", key, raw)),
        Err(_) => Ok(None),
    }
}
