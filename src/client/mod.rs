// src/client/mod.rs — Authenticated API client with refresh-on-401
//
// Every call carries `Authorization: Bearer <access token>` when the session
// holds one. A 401 triggers at most one refresh per logical request (its
// `RetryBudget`); the original call is then replayed with the new token and
// whatever the replay returns is final. When the refresh itself fails the
// session is cleared and `SessionEvent::Expired` is broadcast.

pub mod request;

pub use request::{ApiRequest, FilePart, RequestBody, RetryBudget, Timeout};

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use url::Url;

use crate::auth::Session;
use crate::infra::config::ApiConfig;
use crate::infra::errors::{ApiError, StorageError};
use crate::util::truncate_str;

/// Capacity of the session event channel; slow subscribers just miss events.
const EVENT_CAPACITY: usize = 16;

/// Longest response body excerpt written to logs.
const LOG_BODY_LIMIT: usize = 512;

/// Signals the hosting application subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Tokens were rejected and could not be refreshed; they have been cleared.
    Expired,
}

/// Join an endpoint path onto the base URL with exactly one `/` between them.
pub fn endpoint_url(base: &Url, path: &str) -> Url {
    let mut url = base.clone();
    let joined = format!(
        "{}/{}",
        base.path().trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    url.set_path(&joined);
    url
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

#[derive(Deserialize)]
struct RefreshResponse {
    #[serde(default)]
    access: Option<String>,
    /// Present when the backend rotates refresh tokens.
    #[serde(default)]
    refresh: Option<String>,
}

/// Why a refresh attempt failed. Any of these ends the session.
#[derive(Debug, thiserror::Error)]
enum RefreshError {
    #[error("no refresh token stored")]
    MissingRefreshToken,
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("token storage error: {0}")]
    Storage(#[from] StorageError),
}

/// What the 401 handler decided.
enum Recovery {
    /// A usable access token is stored; send the original request again.
    Replay,
    /// Refresh answered without a new access token; surface the original 401.
    Propagate,
}

struct Inner {
    base_url: Url,
    refresh_url: Url,
    standard: reqwest::Client,
    long: reqwest::Client,
    session: Session,
    events: broadcast::Sender<SessionEvent>,
    /// Serializes refreshes so concurrent 401s share one refresh call.
    refresh_lock: Mutex<()>,
}

/// Cheap to clone; clones share transports, session and event channel.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<Inner>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, session: Session) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ApiError::Config(format!("invalid base URL '{}': {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Config(format!(
                "base URL '{}' cannot carry paths",
                config.base_url
            )));
        }
        let refresh_url = endpoint_url(&base_url, &config.refresh_path);

        let standard = build_transport(config, config.timeout())?;
        let long = build_transport(config, config.long_timeout())?;
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        tracing::debug!(
            base_url = %base_url,
            timeout_ms = config.timeout_ms,
            long_timeout_ms = config.long_timeout_ms,
            "API client configured"
        );

        Ok(Self {
            inner: Arc::new(Inner {
                base_url,
                refresh_url,
                standard,
                long,
                session,
                events,
                refresh_lock: Mutex::new(()),
            }),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    pub fn url(&self, path: &str) -> Url {
        endpoint_url(&self.inner.base_url, path)
    }

    /// Receive `SessionEvent::Expired` whenever an unrecoverable 401 clears the session.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    /// Drop both stored tokens.
    pub fn logout(&self) -> Result<(), StorageError> {
        tracing::info!("logging out");
        self.inner.session.clear()
    }

    /// Issue `method path` with an optional body on the chosen transport.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        timeout: Timeout,
    ) -> Result<Response, ApiError> {
        let mut request = ApiRequest::new(method, path).with_timeout(timeout);
        request.body = body;
        self.execute(request).await
    }

    /// Send a request, refreshing and replaying once on 401.
    ///
    /// Success responses are returned untouched. Non-success responses
    /// become `ApiError::Http`; their body has already been read.
    pub async fn execute(&self, mut request: ApiRequest) -> Result<Response, ApiError> {
        loop {
            let token = self.inner.session.access_token()?;
            let response = self.dispatch(&request, token.as_deref()).await?;
            let status = response.status();
            if status.is_success() {
                return Ok(response);
            }

            let body = response.text().await.unwrap_or_default();

            if status == StatusCode::UNAUTHORIZED && request.retry.take() {
                match self.recover(token.as_deref()).await? {
                    Recovery::Replay => {
                        tracing::debug!(
                            method = %request.method,
                            path = %request.path,
                            "replaying request with refreshed token"
                        );
                        continue;
                    }
                    Recovery::Propagate => {}
                }
            }

            tracing::warn!(
                method = %request.method,
                url = %self.url(&request.path),
                status = status.as_u16(),
                body = truncate_str(&body, LOG_BODY_LIMIT),
                "API call failed"
            );
            return Err(ApiError::Http { status, body });
        }
    }

    /// Execute and decode a JSON response body.
    pub async fn execute_json<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<T, ApiError> {
        let path = request.path.clone();
        let response = self.execute(request).await?;
        response.json::<T>().await.map_err(|e| {
            tracing::warn!(%path, error = %e, "response body did not match the expected shape");
            ApiError::Decode(e.to_string())
        })
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute_json(ApiRequest::get(path)).await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute_json(ApiRequest::post(path).with_json(body)?).await
    }

    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute_json(ApiRequest::put(path).with_json(body)?).await
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        parts: Vec<FilePart>,
    ) -> Result<T, ApiError> {
        self.execute_json(ApiRequest::post(path).with_multipart(parts)).await
    }

    // ─── Request stage ──────────────────────────────────────────────────────

    async fn dispatch(
        &self,
        request: &ApiRequest,
        token: Option<&str>,
    ) -> Result<Response, ApiError> {
        let url = self.url(&request.path);
        let transport = match request.timeout {
            Timeout::Standard => &self.inner.standard,
            Timeout::Long => &self.inner.long,
        };

        let mut builder = transport.request(request.method.clone(), url.clone());
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        builder = request.body.apply(builder)?;

        tracing::debug!(
            method = %request.method,
            %url,
            authenticated = token.is_some(),
            "sending request"
        );

        builder
            .send()
            .await
            .map_err(|e| ApiError::transport(url.as_str(), e))
    }

    // ─── Response stage: 401 recovery ───────────────────────────────────────

    /// Handle a 401 for a request that was sent with `stale` as its token.
    async fn recover(&self, stale: Option<&str>) -> Result<Recovery, ApiError> {
        let _guard = self.inner.refresh_lock.lock().await;

        // Another request may have refreshed (or expired) the session while
        // this one waited for the lock.
        let current = self.inner.session.access_token()?;
        if current.as_deref() != stale {
            return match current {
                Some(_) => {
                    tracing::debug!("access token already refreshed by a concurrent request");
                    Ok(Recovery::Replay)
                }
                None => Err(ApiError::SessionExpired),
            };
        }

        match self.refresh().await {
            Ok(true) => Ok(Recovery::Replay),
            Ok(false) => {
                tracing::warn!("refresh response carried no access token");
                Ok(Recovery::Propagate)
            }
            Err(reason) => {
                self.expire(&reason);
                Err(ApiError::SessionExpired)
            }
        }
    }

    /// Exchange the stored refresh token for a new access token and persist it.
    /// `Ok(false)` means the backend answered 2xx without an access token.
    async fn refresh(&self) -> Result<bool, RefreshError> {
        let refresh_token = self
            .inner
            .session
            .refresh_token()?
            .ok_or(RefreshError::MissingRefreshToken)?;

        let url = &self.inner.refresh_url;
        tracing::debug!(%url, "refreshing access token");

        let response = self
            .inner
            .standard
            .post(url.clone())
            .json(&RefreshRequest {
                refresh: &refresh_token,
            })
            .send()
            .await
            .map_err(|e| ApiError::transport(url.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Http { status, body }.into());
        }

        let tokens: RefreshResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        let Some(access) = tokens.access.filter(|t| !t.is_empty()) else {
            return Ok(false);
        };

        self.inner.session.set_access_token(&access)?;
        if let Some(rotated) = tokens.refresh.filter(|t| !t.is_empty()) {
            self.inner.session.set_refresh_token(&rotated)?;
        }
        tracing::info!("access token refreshed");
        Ok(true)
    }

    fn expire(&self, reason: &RefreshError) {
        tracing::warn!(error = %reason, "token refresh failed, clearing session");
        if let Err(e) = self.inner.session.clear() {
            tracing::warn!(error = %e, "failed to clear stored tokens");
        }
        // No subscribers is fine.
        let _ = self.inner.events.send(SessionEvent::Expired);
    }
}

fn build_transport(
    config: &ApiConfig,
    timeout: std::time::Duration,
) -> Result<reqwest::Client, ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    let mut builder = reqwest::Client::builder()
        .timeout(timeout)
        .default_headers(headers);
    if !config.use_proxy {
        builder = builder.no_proxy();
    }
    builder
        .build()
        .map_err(|e| ApiError::Config(format!("failed to build HTTP client: {e}")))
}
