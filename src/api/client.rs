//! Authenticated request pipeline.
//!
//! Every call goes through [`ApiClient::send`]:
//! 1. Attach `Authorization: Bearer <access>` unless the request opted out or
//!    targets `/api/auth/`.
//! 2. On `401`, exchange the stored refresh token (single-flight) and resend
//!    once with the new access token.
//! 3. When no refresh is possible, clear the stored pair and resend eligible
//!    public reads once without credentials; otherwise surface the `401`.

use super::{
    config::ClientConfig,
    errors::ApiError,
    policy::{is_auth_endpoint, TOKEN_REFRESH_PATH},
    refresh::{ExchangeResult, RefreshSlot},
    request::{ApiRequest, ApiResponse, Attempt},
};
use crate::storage::Credentials;
use futures_util::future::{BoxFuture, FutureExt};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use std::{sync::Arc, time::Duration};
use tracing::{debug, instrument, warn};

/// Default hard deadline for [`ApiClient::get_with_deadline`].
pub const DEFAULT_DEADLINE: Duration = Duration::from_millis(8_000);
/// Shortest deadline accepted; smaller values are raised to this.
pub const MIN_DEADLINE: Duration = Duration::from_millis(1_000);

#[derive(Deserialize)]
struct RefreshResponse {
    access: Option<String>,
    refresh: Option<String>,
}

#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    transport: Arc<Transport>,
    refresh: RefreshSlot,
}

/// Everything a refresh exchange needs. Kept apart from the refresh slot so
/// an exchange parked in the slot never owns the slot itself.
struct Transport {
    http: reqwest::Client,
    config: ClientConfig,
    credentials: Credentials,
}

impl ApiClient {
    /// Build a client bound to the given credential store.
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: ClientConfig, credentials: Credentials) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|err| ApiError::config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                transport: Arc::new(Transport {
                    http,
                    config,
                    credentials,
                }),
                refresh: RefreshSlot::default(),
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.transport.config
    }

    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.inner.transport.credentials
    }

    /// True when no refresh exchange is outstanding.
    #[must_use]
    pub fn refresh_idle(&self) -> bool {
        self.inner.refresh.is_idle()
    }

    /// Send a request through the auth pipeline.
    /// # Errors
    /// Returns the transport or HTTP error once recovery (if any) is exhausted.
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let mut attempt = Attempt::first(self.outgoing_bearer(request));
        loop {
            match self
                .inner
                .transport
                .dispatch(request, attempt.bearer.as_ref())
                .await
            {
                Ok(response) => return Ok(response),
                Err(err) => attempt = self.recover(request, &attempt, err).await?,
            }
        }
    }

    /// GET with a hard deadline independent of the transport timeout.
    ///
    /// `None` or zero means [`DEFAULT_DEADLINE`]; anything shorter than
    /// [`MIN_DEADLINE`] is raised to it. On expiry the in-flight request is
    /// dropped, which cancels it, and a timeout error is returned.
    /// # Errors
    /// Returns a timeout error on expiry, otherwise whatever `send` returns.
    pub async fn get_with_deadline(
        &self,
        request: ApiRequest,
        deadline: Option<Duration>,
    ) -> Result<ApiResponse, ApiError> {
        let limit = effective_deadline(deadline);
        let request = ApiRequest {
            method: reqwest::Method::GET,
            body: None,
            ..request
        };

        match tokio::time::timeout(limit, self.send(&request)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(path = %request.path, "request exceeded {}ms deadline", limit.as_millis());
                Err(ApiError::timeout(limit))
            }
        }
    }

    /// # Errors
    /// Returns an error if the request fails or the body does not decode.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(&ApiRequest::get(path)).await?.json()
    }

    /// # Errors
    /// Returns an error if the request fails, times out or does not decode.
    pub async fn get_json_with_deadline<T: DeserializeOwned>(
        &self,
        path: &str,
        deadline: Option<Duration>,
    ) -> Result<T, ApiError> {
        self.get_with_deadline(ApiRequest::get(path), deadline)
            .await?
            .json()
    }

    /// # Errors
    /// Returns an error if the request fails or the body does not decode.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(&ApiRequest::post(path).json(body)?).await?.json()
    }

    /// # Errors
    /// Returns an error if the request fails or the body does not decode.
    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(&ApiRequest::put(path).json(body)?).await?.json()
    }

    /// # Errors
    /// Returns an error if the request fails or the body does not decode.
    pub async fn patch_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(&ApiRequest::patch(path).json(body)?).await?.json()
    }

    /// # Errors
    /// Returns an error if the request fails.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(&ApiRequest::delete(path)).await.map(|_| ())
    }

    /// Token attached to a first attempt, if any.
    fn outgoing_bearer(&self, request: &ApiRequest) -> Option<SecretString> {
        if request.skip_auth || is_auth_endpoint(&request.path) {
            return None;
        }
        self.credentials().access_token()
    }

    /// Decide the next attempt after a failure, or give the error back.
    async fn recover(
        &self,
        request: &ApiRequest,
        attempt: &Attempt,
        err: ApiError,
    ) -> Result<Attempt, ApiError> {
        if !err.is_unauthorized() || !attempt.tag.is_fresh() {
            return Err(err);
        }
        // Requests that never carry credentials cannot be fixed by new ones.
        if request.skip_auth || is_auth_endpoint(&request.path) {
            return Err(err);
        }

        let Some(refresh) = self.credentials().refresh_token() else {
            debug!("401 without a refresh token; clearing stored credentials");
            self.inner.transport.clear_credentials();
            return self.anonymous_retry(request, err);
        };

        match self.inner.refresh.run(|| self.start_exchange(refresh)).await {
            Ok(access) => {
                debug!("retrying with refreshed access token");
                Ok(Attempt::with_token(access))
            }
            Err(refresh_err) => {
                debug!("token refresh failed: {refresh_err}");
                self.anonymous_retry(request, err)
            }
        }
    }

    fn anonymous_retry(&self, request: &ApiRequest, err: ApiError) -> Result<Attempt, ApiError> {
        if self
            .config()
            .retry_policy
            .allows_anonymous_retry(&request.method, &request.path)
        {
            debug!("retrying public read without credentials");
            Ok(Attempt::anonymous())
        } else {
            Err(err)
        }
    }

    fn start_exchange(&self, refresh: SecretString) -> BoxFuture<'static, ExchangeResult> {
        let transport = Arc::clone(&self.inner.transport);
        async move { transport.exchange_refresh_token(refresh).await }.boxed()
    }
}

impl Transport {
    /// Trade the refresh token for a new access token and persist the result.
    /// On any failure both stored tokens are cleared.
    #[instrument(skip_all)]
    async fn exchange_refresh_token(&self, refresh: SecretString) -> ExchangeResult {
        let outcome = self.request_refresh(&refresh).await;
        let credentials = &self.credentials;

        match outcome {
            Ok((access, rotated)) => {
                if let Err(err) = credentials.set_access_token(&access) {
                    warn!("failed to persist refreshed access token: {err}");
                }
                // The backend may rotate refresh tokens; keep the newest one.
                if let Some(rotated) = rotated {
                    if let Err(err) = credentials.set_refresh_token(&rotated) {
                        warn!("failed to persist rotated refresh token: {err}");
                    }
                }
                Ok(SecretString::from(access))
            }
            Err(err) => {
                warn!("refresh token rejected, clearing stored credentials: {err}");
                self.clear_credentials();
                Err(err)
            }
        }
    }

    async fn request_refresh(
        &self,
        refresh: &SecretString,
    ) -> Result<(String, Option<String>), ApiError> {
        let request = ApiRequest::post(TOKEN_REFRESH_PATH)
            .json(&json!({ "refresh": refresh.expose_secret() }))?;
        let body: RefreshResponse = self.dispatch(&request, None).await?.json()?;

        let access = body
            .access
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| ApiError::decode("refresh response has no access token"))?;
        let rotated = body.refresh.filter(|token| !token.trim().is_empty());
        Ok((access, rotated))
    }

    fn clear_credentials(&self) {
        if let Err(err) = self.credentials.clear() {
            warn!("failed to clear stored credentials: {err}");
        }
    }

    /// One raw HTTP exchange; non-2xx statuses become [`ApiError::http`].
    async fn dispatch(
        &self,
        request: &ApiRequest,
        bearer: Option<&SecretString>,
    ) -> Result<ApiResponse, ApiError> {
        let url = self.config.url_for(&request.path);
        let mut builder = self.http.request(request.method.clone(), url);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = bearer {
            builder = builder.bearer_auth(token.expose_secret());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|err| ApiError::from_transport(&err))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| ApiError::from_transport(&err))?;

        debug!(status = status.as_u16(), "response received");

        if status.is_success() {
            Ok(ApiResponse {
                status: status.as_u16(),
                body,
            })
        } else {
            Err(ApiError::http(status.as_u16(), &body))
        }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.config().base_url)
            .field("credentials", self.credentials())
            .finish_non_exhaustive()
    }
}

/// Apply the default and the floor to a requested deadline.
#[must_use]
pub fn effective_deadline(requested: Option<Duration>) -> Duration {
    requested
        .filter(|deadline| !deadline.is_zero())
        .unwrap_or(DEFAULT_DEADLINE)
        .max(MIN_DEADLINE)
}
