//! Path rules for credential attachment and the anonymous retry fallback.

use reqwest::Method;

pub const API_PREFIX: &str = "/api/";
pub const AUTH_PREFIX: &str = "/api/auth/";
pub const CURRENT_USER_PATH: &str = "/api/me";
pub const NOTIFICATIONS_PREFIX: &str = "/api/notifications/";

pub const TOKEN_PATH: &str = "/api/auth/token/";
pub const TOKEN_REFRESH_PATH: &str = "/api/auth/token/refresh/";
pub const REGISTER_PATH: &str = "/api/auth/register/";
pub const ME_PATH: &str = "/api/me/";

/// Decides which failed reads may be resent without credentials.
///
/// Only `GET` requests under `/api/` qualify, minus the blocked prefixes:
/// auth endpoints, the current-user endpoint and notifications by default.
/// Those must fail loudly instead of silently answering as an anonymous user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    blocked_prefixes: Vec<String>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            blocked_prefixes: vec![
                AUTH_PREFIX.to_string(),
                CURRENT_USER_PATH.to_string(),
                NOTIFICATIONS_PREFIX.to_string(),
            ],
        }
    }
}

impl RetryPolicy {
    /// Add another prefix that must never be retried anonymously.
    #[must_use]
    pub fn with_blocked_prefix(mut self, prefix: &str) -> Self {
        let prefix = normalize_path(prefix);
        if !self.blocked_prefixes.contains(&prefix) {
            self.blocked_prefixes.push(prefix);
        }
        self
    }

    #[must_use]
    pub fn blocked_prefixes(&self) -> &[String] {
        &self.blocked_prefixes
    }

    #[must_use]
    pub fn allows_anonymous_retry(&self, method: &Method, path: &str) -> bool {
        if *method != Method::GET {
            return false;
        }
        let path = normalize_path(path);
        if !path.starts_with(API_PREFIX) {
            return false;
        }
        !self
            .blocked_prefixes
            .iter()
            .any(|prefix| has_prefix(&path, prefix))
    }
}

/// Requests to auth endpoints never carry an Authorization header.
#[must_use]
pub fn is_auth_endpoint(path: &str) -> bool {
    has_prefix(&normalize_path(path), AUTH_PREFIX)
}

/// Segment-aware prefix test: `/api/me` covers `/api/me` and `/api/me/avatar/`
/// but not `/api/media/`. Prefixes ending in `/` match plainly.
fn has_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        None => false,
        Some(rest) => prefix.ends_with('/') || rest.is_empty() || rest.starts_with('/'),
    }
}

/// Leading slash, no query string or fragment.
pub(crate) fn normalize_path(path: &str) -> String {
    let path = path.trim();
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let path = &path[..end];
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}
