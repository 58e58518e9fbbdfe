//! # plc-client (Forum API Client)
//!
//! `plc-client` is the client side of the PLC forum: boards, posts, comments,
//! notifications and moderation are served by a REST API under `/api/`, and
//! this crate holds everything a front end needs to talk to it safely.
//!
//! ## Authenticated Requests
//!
//! [`api::ApiClient`] attaches the stored access token as a bearer header to
//! every request outside `/api/auth/`. When the backend answers `401`, the
//! client exchanges the stored refresh token exactly once per refresh cycle,
//! no matter how many requests fail at the same time, and resends the failed
//! request with the new token. When no refresh is possible, public reads are
//! resent anonymously; everything else surfaces the `401`.
//!
//! ## Session & Navigation
//!
//! [`session::SessionManager`] owns the logged-in profile and the
//! login/register/logout flows. [`router::Router`] consults it before each
//! navigation to keep anonymous users out of member pages and non-staff users
//! out of `/admin`. The guard is UX only; the API enforces access.
//!
//! ## Rendering Helpers
//!
//! [`sanitize::sanitize_html`] cleans user HTML with a fixed allowlist, and the
//! [`format`] module renders timestamps, backend error payloads and image
//! upload checks in the forum's locale.

pub mod api;
pub mod cli;
pub mod format;
pub mod router;
pub mod sanitize;
pub mod session;
pub mod storage;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
