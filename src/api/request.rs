use super::errors::ApiError;
use reqwest::Method;
use secrecy::SecretString;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

/// Description of a single API call. The client decides which credentials
/// go with it; callers only opt out with [`ApiRequest::skip_auth`].
#[derive(Clone, Debug)]
pub struct ApiRequest {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) body: Option<Value>,
    pub(crate) skip_auth: bool,
}

impl ApiRequest {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            skip_auth: false,
        }
    }

    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    #[must_use]
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Attach a JSON body.
    /// # Errors
    /// Returns an error if the body cannot be encoded.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|err| ApiError::config(format!("Failed to encode request: {err}")))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Send this request without an Authorization header.
    #[must_use]
    pub fn skip_auth(mut self) -> Self {
        self.skip_auth = true;
        self
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn skips_auth(&self) -> bool {
        self.skip_auth
    }
}

/// Which recovery path, if any, a call has already taken. Transitions only
/// ever leave `Fresh`, so each call is retried at most once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetryTag {
    Fresh,
    AuthRetried,
    NoAuthRetried,
}

impl RetryTag {
    #[must_use]
    pub fn is_fresh(self) -> bool {
        self == Self::Fresh
    }
}

/// One send of a request: the retry state plus the bearer token to attach.
#[derive(Clone, Debug)]
pub(crate) struct Attempt {
    pub(crate) tag: RetryTag,
    pub(crate) bearer: Option<SecretString>,
}

impl Attempt {
    pub(crate) fn first(bearer: Option<SecretString>) -> Self {
        Self {
            tag: RetryTag::Fresh,
            bearer,
        }
    }

    pub(crate) fn with_token(token: SecretString) -> Self {
        Self {
            tag: RetryTag::AuthRetried,
            bearer: Some(token),
        }
    }

    pub(crate) fn anonymous() -> Self {
        Self {
            tag: RetryTag::NoAuthRetried,
            bearer: None,
        }
    }
}

/// A successful (2xx) response with its raw body.
#[derive(Clone, Debug)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    /// Decode the body as JSON. Empty bodies decode as `null`.
    /// # Errors
    /// Returns a decode error if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        let body = if self.body.trim().is_empty() {
            "null"
        } else {
            self.body.as_str()
        };
        serde_json::from_str(body).map_err(ApiError::decode)
    }
}

/// Unwraps list endpoints that answer either with a bare array or with a
/// paginated `{"results": [...]}` envelope. Anything else is an empty list.
#[must_use]
pub fn unwrap_list(data: Value) -> Vec<Value> {
    match data {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("results") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}
