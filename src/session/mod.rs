//! Auth session manager. It owns the in-memory profile (`me`) and wraps
//! login, registration, logout and profile loading around [`ApiClient`].
//!
//! Flow Overview: login trades credentials for a token pair, persists it and
//! loads the profile. Registration creates the account, flags the one-time
//! avatar prompt and then logs in with the same credentials. Logout only
//! forgets local state; tokens are not revoked server-side.
//!
//! State is published through a `tokio::sync::watch` channel so UI code and
//! the router guard observe changes without polling. Token material is never
//! logged.

mod types;

pub use types::{Me, Registration, SessionState};

use crate::{
    api::{ApiClient, ApiError, ApiRequest, ME_PATH, REGISTER_PATH, TOKEN_PATH},
    format::errors::format_api_error,
};
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};
use types::TokenPair;

pub struct SessionManager {
    api: ApiClient,
    state: watch::Sender<SessionState>,
}

impl SessionManager {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self { api, state }
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Observe session changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn me(&self) -> Option<Me> {
        self.state.borrow().me.clone()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    /// True when an access token is stored. No network call.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.api.credentials().has_access_token()
    }

    /// Exchange credentials for a token pair, persist it and load the profile.
    /// # Errors
    /// Returns the API error for rejected credentials or transport failures.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<(), ApiError> {
        self.state.send_modify(|state| state.error = None);

        let result = self.obtain_tokens(username, password).await;
        if let Err(err) = &result {
            self.record_error(err);
            return result;
        }

        info!("logged in");
        self.load_me().await;
        Ok(())
    }

    /// Create an account, flag the avatar prompt and log in.
    /// # Errors
    /// Returns the API error from registration or the follow-up login.
    #[instrument(skip(self, registration), fields(username = %registration.username))]
    pub async fn register(&self, registration: &Registration) -> Result<(), ApiError> {
        self.state.send_modify(|state| state.error = None);

        let request = ApiRequest::post(REGISTER_PATH).json(&registration.to_body())?;
        if let Err(err) = self.api.send(&request).await {
            self.record_error(&err);
            return Err(err);
        }
        info!("account registered");

        if let Err(err) = self.api.credentials().set_avatar_prompt() {
            warn!("failed to persist avatar prompt flag: {err}");
        }

        self.login(&registration.username, &registration.password)
            .await
    }

    /// Consume the one-shot "set your avatar" prompt left by registration.
    #[must_use]
    pub fn take_avatar_prompt(&self) -> bool {
        match self.api.credentials().take_avatar_prompt() {
            Ok(pending) => pending,
            Err(err) => {
                warn!("failed to consume avatar prompt flag: {err}");
                false
            }
        }
    }

    /// Forget the stored tokens and the profile.
    pub fn logout(&self) {
        if let Err(err) = self.api.credentials().clear() {
            warn!("failed to clear stored credentials: {err}");
        }
        self.state.send_modify(|state| state.me = None);
        info!("logged out");
    }

    /// Load the profile for the stored access token. Failures are treated as
    /// "not logged in" and never surfaced.
    #[instrument(skip(self))]
    pub async fn load_me(&self) {
        if !self.is_authenticated() {
            self.state.send_modify(|state| state.me = None);
            return;
        }

        self.state.send_modify(|state| state.loading = true);
        let me = match self.api.get_json::<Me>(ME_PATH).await {
            Ok(me) => Some(me),
            Err(err) => {
                debug!("profile load failed, treating session as anonymous: {err}");
                None
            }
        };
        self.state.send_modify(|state| {
            state.me = me;
            state.loading = false;
        });
    }

    async fn obtain_tokens(&self, username: &str, password: &SecretString) -> Result<(), ApiError> {
        let body = json!({ "username": username, "password": password.expose_secret() });
        let pair: TokenPair = self.api.post_json(TOKEN_PATH, &body).await?;
        self.api
            .credentials()
            .store_pair(&pair.access, &pair.refresh)
            .map_err(ApiError::storage)
    }

    fn record_error(&self, err: &ApiError) {
        let message = format_api_error(err, None);
        self.state.send_modify(|state| state.error = Some(message));
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("api", &self.api)
            .field("state", &*self.state.borrow())
            .finish()
    }
}
