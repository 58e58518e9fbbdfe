//! Client configuration: the backend origin requests are sent to and the
//! transport timeouts. Values come from CLI flags or environment variables and
//! are public; do not store secrets here.

use super::policy::RetryPolicy;
use crate::APP_USER_AGENT;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
/// Transport-level timeout applied to every request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(15_000);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("base URL is empty")]
    EmptyBaseUrl,
    #[error("invalid base URL {0}: {1}")]
    InvalidBaseUrl(String, String),
    #[error("unsupported base URL scheme: {0}")]
    UnsupportedScheme(String),
}

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub base_url: String,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
    pub retry_policy: RetryPolicy,
}

impl ClientConfig {
    /// Build a config for the given backend origin with default timeouts.
    /// # Errors
    /// Returns an error if the base URL is empty, malformed, or not http(s).
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let base_url = normalize_value(base_url).ok_or(ConfigError::EmptyBaseUrl)?;
        let parsed = Url::parse(&base_url)
            .map_err(|err| ConfigError::InvalidBaseUrl(base_url.clone(), err.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(parsed.scheme().to_string()));
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            user_agent: APP_USER_AGENT.to_string(),
            retry_policy: RetryPolicy::default(),
        })
    }

    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Builds a URL from the configured base URL and the provided path.
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        build_url_with_base(&self.base_url, path)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            user_agent: APP_USER_AGENT.to_string(),
            retry_policy: RetryPolicy::default(),
        }
    }
}

/// Builds a URL from an explicit base URL and the provided path.
fn build_url_with_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

/// Trims a configured value and rejects empty ones.
#[must_use]
pub fn normalize_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
