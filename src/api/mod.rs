//! HTTP client core for the forum REST API.
//!
//! Feature code builds an [`ApiRequest`] (or uses the JSON helpers) and hands
//! it to [`ApiClient`], which owns credential attachment, `401` recovery and
//! the bounded-wait helper. All failures come back as one [`ApiError`] shape;
//! callers branch on its status and payload.

mod client;
mod config;
mod errors;
mod policy;
mod refresh;
mod request;

pub use client::{effective_deadline, ApiClient, DEFAULT_DEADLINE, MIN_DEADLINE};
pub use config::{
    normalize_value, ClientConfig, ConfigError, DEFAULT_BASE_URL, DEFAULT_CONNECT_TIMEOUT,
    DEFAULT_REQUEST_TIMEOUT,
};
pub use errors::{is_html_page, ApiError, ErrorKind, ErrorPayload, FieldErrors};
pub use policy::{
    is_auth_endpoint, RetryPolicy, API_PREFIX, AUTH_PREFIX, CURRENT_USER_PATH, ME_PATH,
    NOTIFICATIONS_PREFIX, REGISTER_PATH, TOKEN_PATH, TOKEN_REFRESH_PATH,
};
pub use request::{unwrap_list, ApiRequest, ApiResponse, RetryTag};
