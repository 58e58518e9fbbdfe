use serde_json::Value;
use std::{fmt, time::Duration};
use thiserror::Error;

/// Maximum number of error body characters carried in the error message.
const MAX_ERROR_CHARS: usize = 200;

/// Broad failure class. Callers usually branch on [`ApiError::status`] and
/// [`ApiError::payload`] instead; the kind only separates "no response" cases.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Network,
    Timeout,
    Http,
    Decode,
    Storage,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Config => "config",
            Self::Network => "network",
            Self::Timeout => "timeout",
            Self::Http => "http",
            Self::Decode => "decode",
            Self::Storage => "storage",
        };
        formatter.write_str(label)
    }
}

/// The single error shape surfaced by the HTTP client.
#[derive(Clone, Debug, Error)]
#[error("{message}")]
pub struct ApiError {
    kind: ErrorKind,
    status: Option<u16>,
    payload: Option<ErrorPayload>,
    message: String,
}

impl ApiError {
    pub(crate) fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: None,
            payload: None,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, format!("Config error: {}", message.into()))
    }

    #[must_use]
    pub fn network(message: impl fmt::Display) -> Self {
        Self::new(
            ErrorKind::Network,
            format!("Unable to reach the server: {message}"),
        )
    }

    #[must_use]
    pub fn timeout(after: Duration) -> Self {
        Self::new(
            ErrorKind::Timeout,
            format!("Request timeout after {}ms", after.as_millis()),
        )
    }

    #[must_use]
    pub fn decode(message: impl fmt::Display) -> Self {
        Self::new(
            ErrorKind::Decode,
            format!("Failed to decode response: {message}"),
        )
    }

    #[must_use]
    pub fn storage(message: impl fmt::Display) -> Self {
        Self::new(ErrorKind::Storage, format!("Storage error: {message}"))
    }

    /// Build an HTTP error from a non-2xx response body.
    #[must_use]
    pub fn http(status: u16, body: &str) -> Self {
        Self {
            kind: ErrorKind::Http,
            status: Some(status),
            payload: ErrorPayload::parse(body),
            message: format!("Request failed ({status}): {}", sanitize_body(body)),
        }
    }

    /// Map transport failures, detecting the transport's own timeout.
    pub(crate) fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::new(
                ErrorKind::Timeout,
                "Request timed out. Please try again.".to_string(),
            )
        } else if err.is_decode() {
            Self::decode(err)
        } else {
            Self::network(err)
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    #[must_use]
    pub fn payload(&self) -> Option<&ErrorPayload> {
        self.payload.as_ref()
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status == Some(401)
    }

    #[must_use]
    pub fn is_timeout(&self) -> bool {
        self.kind == ErrorKind::Timeout
    }
}

/// Trims and truncates error bodies for user-facing messages.
fn sanitize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Request failed.".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}

/// Messages reported against a single request field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldErrors {
    pub field: String,
    pub messages: Vec<String>,
}

/// Shapes the backend uses for error bodies.
#[derive(Clone, Debug, PartialEq)]
pub enum ErrorPayload {
    /// Plain text body.
    Text(String),
    /// An HTML error page (framework debug or proxy page).
    Html(String),
    /// `{"detail": "..."}`.
    Detail(String),
    /// `{"field": ["msg", ...], ...}` in backend order.
    Fields(Vec<FieldErrors>),
    /// Any other JSON value.
    Other(Value),
}

impl ErrorPayload {
    /// Parse a raw response body. Empty bodies carry no payload.
    #[must_use]
    pub fn parse(body: &str) -> Option<Self> {
        if body.trim().is_empty() {
            return None;
        }
        match serde_json::from_str::<Value>(body) {
            Ok(value) => Self::from_value(value),
            Err(_) => Some(Self::from_text(body)),
        }
    }

    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::String(text) if text.is_empty() => None,
            Value::String(text) => Some(Self::from_text(&text)),
            Value::Object(map) => {
                if let Some(detail) = map.get("detail").filter(|detail| is_truthy(detail)) {
                    return Some(Self::Detail(value_text(detail)));
                }
                if map.is_empty() {
                    return Some(Self::Other(Value::Object(map)));
                }
                let fields = map
                    .into_iter()
                    .filter(|(_, raw)| !raw.is_null())
                    .map(|(field, raw)| {
                        let messages = match raw {
                            Value::Array(items) => items.iter().map(value_text).collect(),
                            single => vec![value_text(&single)],
                        };
                        FieldErrors { field, messages }
                    })
                    .collect();
                Some(Self::Fields(fields))
            }
            other => Some(Self::Other(other)),
        }
    }

    fn from_text(text: &str) -> Self {
        if is_html_page(text) {
            Self::Html(text.to_string())
        } else {
            Self::Text(text.to_string())
        }
    }
}

#[must_use]
pub fn is_html_page(text: &str) -> bool {
    text.to_lowercase().contains("<!doctype html")
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
